//! System clipboard sink.
//!
//! Pipes the text into the platform clipboard tool:
//! - **macOS**: `pbcopy`
//! - **Other**: `xclip -selection clipboard`
//!
//! A missing or failing tool is logged and otherwise ignored; the snippet
//! still reaches the other sinks.

use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::warn;

use super::Sink;

/// Clipboard sink using a copy command
#[derive(Debug, Clone)]
pub struct ClipboardSink {
    program: String,
    args: Vec<String>,
}

impl Default for ClipboardSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink {
    /// Clipboard sink for the current platform
    pub fn new() -> Self {
        if cfg!(target_os = "macos") {
            Self::with_command("pbcopy", &[])
        } else {
            Self::with_command("xclip", &["-selection", "clipboard"])
        }
    }

    /// Clipboard sink with a custom copy command reading stdin
    pub fn with_command(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    async fn copy(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn clipboard command '{}'", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .context("Failed to write to clipboard command")?;
        }

        let output = child
            .wait_with_output()
            .await
            .context("Failed to wait for clipboard command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Clipboard command '{}' failed with exit code {}: {}",
                self.program,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            );
        }

        Ok(())
    }
}

#[async_trait]
impl Sink for ClipboardSink {
    fn name(&self) -> &str {
        "clipboard"
    }

    async fn deliver(&self, text: &str) -> Result<()> {
        if let Err(e) = self.copy(text).await {
            warn!(error = %e, "Could not copy snippet to clipboard");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool_is_not_fatal() {
        let sink = ClipboardSink::with_command("notescli-no-such-clipboard-tool", &[]);
        assert!(sink.copy("x").await.is_err());
        assert!(sink.deliver("x").await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_text_is_piped_to_command() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("clip.txt");
        let script = format!("cat > '{}'", target.display());

        let sink = ClipboardSink::with_command("sh", &["-c", script.as_str()]);
        sink.deliver("copied text").await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "copied text");
    }
}
