//! Configuration for notescli.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables. Each setting is read from its `NOTESCLI_*`
//!    name first, then from the bare name:
//!
//!    | Setting | Variables |
//!    |---------|-----------|
//!    | snippets dir | `NOTESCLI_SNIPPETS_DIR`, `SNIPPETSDIR` |
//!    | inbox dir | `NOTESCLI_INBOX_DIR`, `INBOXDIR` |
//!    | vault | `NOTESCLI_VAULT`, `VAULT` |
//!    | editor | `NOTESCLI_EDITOR`, `EDITOR` |
//!    | template | `NOTESCLI_TEMPLATE`, `TEMPLATE` |
//!
//! 2. Config file (`--config <path>` or ~/.config/notescli/config.yaml)
//! 3. Defaults (~/Notes/...)
//!
//! Config keys are case-insensitive (`snippetsDir` works) and unknown keys
//! are ignored. Relative paths in the config file are resolved against the
//! directory holding the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Default note template; `{{.date}}` and `{{.name}}` are filled on creation
pub const DEFAULT_TEMPLATE: &str = "---
date: {{.date}}
tags:
\t-
hubs:
\t- \"[[]]\"
references:
\t-
---
# {{.name}}
";

/// Raw config file schema, keys lowercased before matching
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Directory of snippet markdown files
    #[serde(alias = "snippetsdir")]
    pub snippets_dir: Option<String>,

    /// Directory new notes are created in
    #[serde(alias = "inboxdir")]
    pub inbox_dir: Option<String>,

    /// Directory searched by tag
    pub vault: Option<String>,

    /// Editor command
    pub editor: Option<String>,

    /// Note template
    pub template: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub snippets_dir: PathBuf,
    pub inbox_dir: PathBuf,
    pub vault: PathBuf,
    pub editor: String,
    pub template: String,
    /// Path to config file (if one was loaded)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Defaults rooted at `home`
    pub fn defaults(home: &Path) -> Self {
        let notes = home.join("Notes");
        Self {
            snippets_dir: notes.join("snippets"),
            inbox_dir: notes.join("inbox"),
            vault: notes,
            editor: "vim".to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            config_file: None,
        }
    }
}

/// Default config file location (~/.config/notescli/config.yaml)
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".config").join("notescli").join("config.yaml"))
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty file parses as YAML null
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    let parse = || format!("Failed to parse config file: {}", path.display());
    let value: Value = serde_yaml::from_str(&content).with_context(parse)?;
    serde_yaml::from_value(lowercase_keys(value)).with_context(parse)
}

/// Lowercase the top-level string keys of a mapping
fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| match key {
                    Value::String(key) => (Value::String(key.to_lowercase()), value),
                    other => (other, value),
                })
                .collect::<Mapping>(),
        ),
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    }
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Apply a config file on top of `config`
fn merge_file(config: &mut ResolvedConfig, file: ConfigFile, path: &Path) {
    let base = path.parent().unwrap_or(Path::new("."));

    if let Some(dir) = file.snippets_dir {
        config.snippets_dir = resolve_path(base, &dir);
    }
    if let Some(dir) = file.inbox_dir {
        config.inbox_dir = resolve_path(base, &dir);
    }
    if let Some(dir) = file.vault {
        config.vault = resolve_path(base, &dir);
    }
    if let Some(editor) = file.editor {
        config.editor = editor;
    }
    if let Some(template) = file.template {
        config.template = template;
    }
    config.config_file = Some(path.to_path_buf());
}

/// Apply environment overrides read through `var`; `NOTESCLI_*` wins over the bare name
fn merge_env(config: &mut ResolvedConfig, var: impl Fn(&str) -> Option<String>) {
    let lookup = |prefixed: &str, bare: &str| var(prefixed).or_else(|| var(bare));

    if let Some(dir) = lookup("NOTESCLI_SNIPPETS_DIR", "SNIPPETSDIR") {
        config.snippets_dir = PathBuf::from(dir);
    }
    if let Some(dir) = lookup("NOTESCLI_INBOX_DIR", "INBOXDIR") {
        config.inbox_dir = PathBuf::from(dir);
    }
    if let Some(dir) = lookup("NOTESCLI_VAULT", "VAULT") {
        config.vault = PathBuf::from(dir);
    }
    if let Some(editor) = lookup("NOTESCLI_EDITOR", "EDITOR") {
        config.editor = editor;
    }
    if let Some(template) = lookup("NOTESCLI_TEMPLATE", "TEMPLATE") {
        config.template = template;
    }
}

/// Load configuration from all sources.
///
/// An explicit `path` must exist; the default location is optional.
pub fn load_config(path: Option<&Path>) -> Result<ResolvedConfig> {
    let home = dirs::home_dir().context("Failed to determine home directory")?;
    let mut config = ResolvedConfig::defaults(&home);

    match path {
        Some(path) => {
            let file = load_config_file(path)?;
            merge_file(&mut config, file, path);
        }
        None => {
            let default_path = default_config_path()?;
            if default_path.exists() {
                let file = load_config_file(&default_path)?;
                merge_file(&mut config, file, &default_path);
            } else {
                debug!(path = %default_path.display(), "No config file, using defaults");
            }
        }
    }

    merge_env(&mut config, |key| {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    });

    Ok(config)
}
