//! Snippet catalog and rendering.
//!
//! Snippets live as markdown files in a single directory. The pipeline is:
//!
//! 1. [`extract`] parses one file into [`Snippet`] records
//! 2. [`CatalogBuilder`] scans the directory, one task per file, into a shared [`Catalog`]
//! 3. [`resolve_inputs`] asks a [`Prompt`] for each declared input
//! 4. [`Renderer`] substitutes the resolved values into the snippet body

pub mod catalog;
pub mod extract;
pub mod render;
pub mod resolve;

use serde::Serialize;

pub use catalog::{Catalog, CatalogBuilder, CatalogError, PendingCatalog};
pub use extract::{extract, CountMismatch, Extraction};
pub use render::{RenderError, Renderer};
pub use resolve::{resolve_inputs, Prompt, ResolveError, ScriptedPrompt, TerminalPrompt};

/// A named, reusable block of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    /// Label shown in the picker (not unique)
    pub name: String,

    /// Fenced body, trimmed
    pub content: String,

    /// Declared template parameters, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<Input>,
}

impl Snippet {
    /// Create a snippet without inputs
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            inputs: Vec::new(),
        }
    }

    /// Declare an input
    pub fn with_input(mut self, name: impl Into<String>, default: Option<&str>) -> Self {
        self.inputs.push(Input {
            name: name.into(),
            default: default.map(str::to_string),
        });
        self
    }

    /// Whether rendering goes through the template engine
    pub fn has_inputs(&self) -> bool {
        !self.inputs.is_empty()
    }
}

/// A named parameter of a snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Input {
    /// Placeholder name used in the snippet body
    pub name: String,

    /// `None` for `- name`, `Some("")` for `- name:`
    pub default: Option<String>,
}

impl Input {
    /// Value used when the prompt answer is empty
    pub fn fallback(&self) -> &str {
        self.default.as_deref().unwrap_or("")
    }
}
