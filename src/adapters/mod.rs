//! Output sinks for rendered snippets.
//!
//! A rendered snippet is always copied to the clipboard and optionally
//! printed or loaded into a tmux buffer.

pub mod clipboard;
pub mod tmux;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

pub use clipboard::ClipboardSink;
pub use tmux::TmuxSink;

/// Trait for output destinations
#[async_trait]
pub trait Sink: Send + Sync {
    /// Human-readable sink name
    fn name(&self) -> &str;

    /// Hand `text` to the destination
    async fn deliver(&self, text: &str) -> Result<()>;
}

/// Prints the rendered text to stdout, without a trailing newline
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

#[async_trait]
impl Sink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn deliver(&self, text: &str) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Sink that records everything it receives; clones share the record
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    received: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts delivered so far
    pub fn received(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn deliver(&self, text: &str) -> Result<()> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(text.to_string());
        Ok(())
    }
}
