//! Concurrent snippet catalog.
//!
//! The catalog is an append-only list of snippets shared between the scan
//! tasks and the picker. Every append takes the lock once, so readers never
//! observe a half-written entry. Ordering across files is whatever order
//! the tasks finish in; snippets of one file keep their document order.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::fs;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::extract::extract;
use super::Snippet;

/// File names never scanned for snippets (compared case-insensitively)
pub const DEFAULT_EXCLUDED: &[&str] = &["README.md"];

/// Errors that abort a catalog scan
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not open snippet directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Shared, append-only snippet list
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Arc<Mutex<Vec<Snippet>>>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `snippets` in order
    pub fn from_snippets(snippets: Vec<Snippet>) -> Self {
        Self {
            items: Arc::new(Mutex::new(snippets)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Snippet>> {
        // push is the only mutation, so a poisoned Vec is still consistent
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append one snippet
    pub fn append(&self, snippet: Snippet) {
        self.lock().push(snippet);
    }

    /// Number of snippets
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snippet at `index`
    pub fn get(&self, index: usize) -> Option<Snippet> {
        self.lock().get(index).cloned()
    }

    /// Picker labels, in catalog order
    pub fn labels(&self) -> Vec<String> {
        self.lock().iter().map(|s| s.name.clone()).collect()
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Vec<Snippet> {
        self.lock().clone()
    }
}

/// Scans a snippet directory into a [`Catalog`]
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    excluded: Vec<String>,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder {
    /// Create a builder with the default exclusions
    pub fn new() -> Self {
        Self {
            excluded: DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Also skip files with this name
    pub fn exclude(mut self, file_name: impl Into<String>) -> Self {
        self.excluded.push(file_name.into());
        self
    }

    fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded
            .iter()
            .any(|e| e.eq_ignore_ascii_case(file_name))
    }

    /// List `dir` and spawn one extraction task per regular file.
    ///
    /// Returns as soon as every task is spawned; the catalog fills in the
    /// background. Tasks are detached, so dropping the [`PendingCatalog`]
    /// does not cancel them. Only a directory that cannot be listed is an
    /// error, unreadable files contribute nothing.
    pub async fn dispatch(&self, dir: &Path) -> Result<PendingCatalog, CatalogError> {
        let unreadable = |source: std::io::Error| CatalogError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(dir).await.map_err(unreadable)?;
        if !metadata.is_dir() {
            return Err(CatalogError::NotADirectory(dir.to_path_buf()));
        }

        let catalog = Catalog::new();
        let mut tasks = Vec::new();
        let mut entries = fs::read_dir(dir).await.map_err(unreadable)?;

        while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();

            if self.is_excluded(&file_name) {
                debug!(file = %file_name, "Skipping excluded file");
                continue;
            }

            match fs::metadata(&path).await {
                Ok(m) if m.is_file() => {}
                _ => continue,
            }

            tasks.push(tokio::spawn(scan_file(path, file_name, catalog.clone())));
        }

        info!(dir = %dir.display(), files = tasks.len(), "Dispatched snippet scan");

        Ok(PendingCatalog { catalog, tasks })
    }

    /// Scan `dir` and wait until every file is in the catalog
    pub async fn build(&self, dir: &Path) -> Result<Catalog, CatalogError> {
        Ok(self.dispatch(dir).await?.wait().await)
    }
}

/// Read and extract one file, then append its snippets one at a time
async fn scan_file(path: PathBuf, file_name: String, catalog: Catalog) {
    let content = match fs::read_to_string(&path).await {
        Ok(c) => c,
        Err(e) => {
            debug!(file = %path.display(), error = %e, "Skipping unreadable snippet file");
            return;
        }
    };

    let extraction = extract(&content, &file_name);
    for snippet in extraction.snippets {
        catalog.append(snippet);
    }
}

/// A catalog whose scan tasks may still be running
#[derive(Debug)]
pub struct PendingCatalog {
    catalog: Catalog,
    tasks: Vec<JoinHandle<()>>,
}

impl PendingCatalog {
    /// The live catalog; may be missing snippets until [`wait`](Self::wait) returns
    pub fn catalog(&self) -> Catalog {
        self.catalog.clone()
    }

    /// Number of scan tasks still running
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Block until every scan task is done
    pub async fn wait(self) -> Catalog {
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Snippet scan task failed");
            }
        }
        self.catalog
    }
}
