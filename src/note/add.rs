//! Fleeting note creation.
//!
//! New notes land in the inbox as `<YYYY-MM-DD HH:MM> - <name>.md`, filled
//! from the configured template with `name` and `date` values.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use tokio::fs;
use tracing::info;

use crate::snippet::Renderer;

/// File name of a note called `name` created at `now`
pub fn note_file_name<Tz: TimeZone>(name: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} - {}.md", now.format("%Y-%m-%d %H:%M"), name)
}

/// Render `template` and write it as a new note in `inbox`.
///
/// An existing note with the same file name is overwritten.
pub async fn create_note<Tz: TimeZone>(
    inbox: &Path,
    name: &str,
    template: &str,
    now: &DateTime<Tz>,
    renderer: &Renderer,
) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    let values = HashMap::from([
        ("name", name.to_string()),
        ("date", now.format("%Y-%m-%d").to_string()),
    ]);

    let content = renderer
        .render_str(template, &values)
        .context("Failed to render note template")?;

    let path = inbox.join(note_file_name(name, now));
    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to create note: {}", path.display()))?;

    info!(path = %path.display(), "Created note");
    Ok(path)
}
