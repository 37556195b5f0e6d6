//! Tag lookup over a note vault.
//!
//! Tags come from the YAML front matter only, as a block list:
//!
//! ```text
//! ---
//! date: 2024-03-09
//! tags:
//!   - rust
//!   - cli
//! ---
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::fs;
use tracing::debug;

/// One tag of one note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    /// Tag text
    pub name: String,

    /// Note file name
    pub filename: String,

    /// Full path to the note
    pub path: PathBuf,
}

/// Tags listed under `tags:` in the front matter of `content`.
///
/// The file must open with a `---` line. Collection stops at the first line
/// after the list that is not a `- tag` item, or at the closing `---`.
pub fn parse_tags(content: &str) -> Vec<String> {
    let mut lines = content.lines();
    if lines.next() != Some("---") {
        return Vec::new();
    }

    let mut tags = Vec::new();
    let mut in_tags = false;

    for line in lines {
        let line = line.trim();

        if in_tags {
            match line.strip_prefix("- ") {
                Some(tag) => {
                    tags.push(tag.trim().to_string());
                    continue;
                }
                None => break,
            }
        }

        if line == "tags:" {
            in_tags = true;
        } else if line == "---" {
            break;
        }
    }

    tags
}

/// Scan the regular files of `vault` (not recursive) for tags
pub async fn collect_tags(vault: &Path) -> Result<Vec<TagEntry>> {
    let mut entries = fs::read_dir(vault)
        .await
        .with_context(|| format!("Could not open vault: {}", vault.display()))?;

    let mut tags = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match fs::metadata(&path).await {
            Ok(m) if m.is_file() => {}
            _ => continue,
        }

        let content = match fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) => {
                debug!(file = %path.display(), error = %e, "Skipping unreadable note");
                continue;
            }
        };

        let filename = entry.file_name().to_string_lossy().into_owned();
        tags.extend(parse_tags(&content).into_iter().map(|name| TagEntry {
            name,
            filename: filename.clone(),
            path: path.clone(),
        }));
    }

    Ok(tags)
}
