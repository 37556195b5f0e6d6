//! Note management: creating inbox notes and finding notes by tag.

pub mod add;
pub mod search;

use std::path::Path;

use anyhow::{Context, Result};
use tokio::process::Command;

pub use add::{create_note, note_file_name};
pub use search::{collect_tags, parse_tags, TagEntry};

/// Open `path` in `editor`, attached to the current terminal
pub async fn open_in_editor(editor: &str, path: &Path) -> Result<()> {
    let status = Command::new(editor)
        .arg(path)
        .status()
        .await
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;

    if !status.success() {
        anyhow::bail!(
            "Editor '{}' exited with code {}",
            editor,
            status.code().unwrap_or(-1)
        );
    }

    Ok(())
}
