//! notescli - notes and snippets from a markdown vault
//!
//! Creates dated notes from a template and turns a directory of markdown
//! files into a catalog of reusable, parameterized snippets.
//!
//! # Snippet files
//!
//! ````text
//! ### greet
//! INPUTS:
//! - who: world
//! ```text
//! Hello {{.who}}!
//! ```
//! ````
//!
//! # Modules
//!
//! - `snippet`: extraction, concurrent catalog, input resolution, rendering
//! - `note`: inbox note creation and tag search
//! - `picker`: interactive selection
//! - `adapters`: output sinks (clipboard, stdout, tmux)
//! - `config`: configuration file and environment
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Pick a snippet, fill its inputs, copy it and print it
//! notescli snippet --print
//!
//! # Create a note in the inbox and open it
//! notescli add --name "weekly review" --open
//!
//! # Open a note by tag
//! notescli search
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod note;
pub mod picker;
pub mod snippet;

// Re-export main types at crate root for convenience
pub use snippet::{Catalog, CatalogBuilder, Input, Renderer, Snippet};
