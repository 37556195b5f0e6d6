//! tmux paste-buffer sink (`tmux load-buffer -w -`).

use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::Sink;

/// Loads text into the tmux paste buffer
#[derive(Debug, Clone)]
pub struct TmuxSink {
    binary_path: String,
}

impl Default for TmuxSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TmuxSink {
    pub fn new() -> Self {
        Self::with_binary_path("tmux")
    }

    pub fn with_binary_path(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }
}

#[async_trait]
impl Sink for TmuxSink {
    fn name(&self) -> &str {
        "tmux"
    }

    async fn deliver(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.binary_path)
            .args(["load-buffer", "-w", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn tmux")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .context("Failed to write to tmux stdin")?;
            // Drop stdin to signal EOF
        }

        let output = child
            .wait_with_output()
            .await
            .context("Failed to wait for tmux")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "tmux load-buffer failed with exit code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            );
        }

        Ok(())
    }
}
