//! Catalog Builder Integration Tests
//!
//! Tests for directory scanning, exclusion rules and concurrent appends.

use std::path::Path;
use std::time::Duration;

use notescli::snippet::{extract, Catalog, CatalogBuilder, CatalogError};
use notescli::Snippet;
use tempfile::TempDir;

const FENCE: &str = "```";

/// Markdown with `count` snippets named `<prefix>-<n>`
fn snippet_file(prefix: &str, count: usize) -> String {
    let mut out = String::from("# Snippets\n\n");
    for n in 0..count {
        out.push_str(&format!(
            "### {prefix}-{n}\n{FENCE}sh\necho {prefix} {n}\n{FENCE}\n\n"
        ));
    }
    out
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_files_contribute_all_snippets() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "git.md", &snippet_file("git", 2));
    write(temp.path(), "docker.md", &snippet_file("docker", 3));

    let catalog = CatalogBuilder::new().build(temp.path()).await.unwrap();
    let labels = catalog.labels();

    assert_eq!(labels.len(), 5);

    // Order across files is not fixed, order within a file is
    let git: Vec<_> = labels.iter().filter(|l| l.starts_with("git")).collect();
    let docker: Vec<_> = labels.iter().filter(|l| l.starts_with("docker")).collect();
    assert_eq!(git, vec!["git-0", "git-1"]);
    assert_eq!(docker, vec!["docker-0", "docker-1", "docker-2"]);
}

#[tokio::test]
async fn test_readme_and_subdirectories_are_skipped() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "README.md", &snippet_file("readme", 4));
    write(temp.path(), "real.md", &snippet_file("real", 1));
    std::fs::create_dir(temp.path().join("nested")).unwrap();
    write(&temp.path().join("nested"), "deep.md", &snippet_file("deep", 2));

    let catalog = CatalogBuilder::new().build(temp.path()).await.unwrap();

    assert_eq!(catalog.labels(), vec!["real-0"]);
}

#[tokio::test]
async fn test_extra_exclusions() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "drafts.md", &snippet_file("draft", 2));
    write(temp.path(), "kept.md", &snippet_file("kept", 1));

    let catalog = CatalogBuilder::new()
        .exclude("drafts.md")
        .build(temp.path())
        .await
        .unwrap();

    assert_eq!(catalog.len(), 1);
}

#[tokio::test]
async fn test_non_utf8_file_is_skipped_silently() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("binary.md"), [0xff, 0xfe, 0x00, 0x23]).unwrap();
    write(temp.path(), "ok.md", &snippet_file("ok", 2));

    let catalog = CatalogBuilder::new().build(temp.path()).await.unwrap();

    assert_eq!(catalog.len(), 2);
}

#[tokio::test]
async fn test_malformed_file_contributes_min_pairs() {
    let temp = TempDir::new().unwrap();
    let content = format!("### a\n### b\n### c\n{FENCE}\none\n{FENCE}\n");
    write(temp.path(), "broken.md", &content);

    let catalog = CatalogBuilder::new().build(temp.path()).await.unwrap();

    assert_eq!(catalog.len(), 1);
    let snippet = catalog.get(0).unwrap();
    assert_eq!(snippet.name, "a");
    assert_eq!(snippet.content, "one");
}

#[tokio::test]
async fn test_missing_directory_is_fatal() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("snippets");

    let err = CatalogBuilder::new().build(&missing).await.unwrap_err();

    assert!(matches!(err, CatalogError::DirectoryUnreadable { .. }));
    assert!(err.to_string().contains("Could not open snippet directory"));
}

#[tokio::test]
async fn test_empty_directory_gives_empty_catalog() {
    let temp = TempDir::new().unwrap();
    let catalog = CatalogBuilder::new().build(temp.path()).await.unwrap();
    assert!(catalog.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dispatch_returns_live_catalog() {
    let temp = TempDir::new().unwrap();
    for i in 0..8 {
        write(temp.path(), &format!("f{i}.md"), &snippet_file(&format!("f{i}"), 3));
    }

    let pending = CatalogBuilder::new().dispatch(temp.path()).await.unwrap();
    let live = pending.catalog();

    // The live handle may be partial here; once the barrier returns it is complete
    assert!(live.len() <= 24);
    let done = pending.wait().await;

    assert_eq!(done.len(), 24);
    assert_eq!(live.len(), 24);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dropping_pending_scan_keeps_filling_catalog() {
    let temp = TempDir::new().unwrap();
    for i in 0..8 {
        write(temp.path(), &format!("f{i}.md"), &snippet_file(&format!("f{i}"), 1));
    }

    // Only the live handle survives; the scan tasks must keep running
    let live = CatalogBuilder::new()
        .dispatch(temp.path())
        .await
        .unwrap()
        .catalog();

    let filled = tokio::time::timeout(Duration::from_secs(5), async {
        while live.len() < 8 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;

    assert!(filled.is_ok(), "only {} of 8 snippets arrived", live.len());
    assert_eq!(live.len(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_scan_never_loses_or_duplicates() {
    let temp = TempDir::new().unwrap();
    let mut expected = 0;

    for i in 0..40 {
        let content = snippet_file(&format!("file{i}"), 1 + i % 7);
        expected += extract(&content, "count").snippets.len();
        write(temp.path(), &format!("file{i}.md"), &content);
    }

    for _ in 0..25 {
        let catalog = CatalogBuilder::new().build(temp.path()).await.unwrap();
        let mut labels = catalog.labels();
        assert_eq!(labels.len(), expected);

        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), expected, "a snippet was appended twice");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_jittered_writers_never_lose_or_duplicate() {
    const WRITERS: usize = 16;
    const PER_WRITER: usize = 20;

    for round in 0..10 {
        let catalog = Catalog::new();
        let mut writers = Vec::new();

        for w in 0..WRITERS {
            let catalog = catalog.clone();
            writers.push(tokio::spawn(async move {
                for n in 0..PER_WRITER {
                    // Vary the interleaving between writers and rounds
                    match (w * 31 + n * 17 + round * 7) % 4 {
                        0 => tokio::task::yield_now().await,
                        1 => tokio::time::sleep(Duration::from_micros(50)).await,
                        2 => tokio::time::sleep(Duration::from_micros(200)).await,
                        _ => {}
                    }
                    catalog.append(Snippet::new(format!("w{w}-{n}"), "x"));
                }
            }));
        }
        for writer in writers {
            writer.await.unwrap();
        }

        let snippets = catalog.snapshot();
        assert_eq!(snippets.len(), WRITERS * PER_WRITER);

        let mut labels = catalog.labels();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), WRITERS * PER_WRITER, "a snippet was appended twice");

        // Each writer's appends keep their own order
        for w in 0..WRITERS {
            let prefix = format!("w{w}-");
            let own: Vec<_> = snippets
                .iter()
                .filter(|s| s.name.starts_with(&prefix))
                .map(|s| s.name.clone())
                .collect();
            let expected: Vec<_> = (0..PER_WRITER).map(|n| format!("w{w}-{n}")).collect();
            assert_eq!(own, expected);
        }
    }
}
