//! Command-line interface for notescli.
//!
//! Provides commands for copying snippets, creating inbox notes, finding
//! notes by tag and listing the snippet catalog.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use crate::adapters::{ClipboardSink, Sink, StdoutSink, TmuxSink};
use crate::config::{load_config, ResolvedConfig};
use crate::note::{collect_tags, create_note, open_in_editor};
use crate::picker::{Picker, TerminalPicker};
use crate::snippet::{CatalogBuilder, Renderer, TerminalPrompt};

pub mod snippet;

pub use snippet::deliver_selection;

/// notescli - manage notes and snippets
#[derive(Parser, Debug)]
#[command(name = "notescli")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default is $HOME/.config/notescli/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find a snippet and copy it to the clipboard
    Snippet {
        /// Also print the selected snippet to stdout
        #[arg(short, long)]
        print: bool,

        /// Also load the selected snippet into the tmux buffer
        #[arg(short, long)]
        tmux: bool,
    },

    /// Create a new fleeting note in the inbox
    Add {
        /// Name of the note file (prompted for if missing)
        #[arg(short, long)]
        name: Option<String>,

        /// Open the note in the editor after creation
        #[arg(short, long)]
        open: bool,
    },

    /// Find a note by its tags and open it in the editor
    Search,

    /// List all snippets
    List {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;

        match self.command {
            Commands::Snippet { print, tmux } => copy_snippet(&config, print, tmux).await,
            Commands::Add { name, open } => add_note(&config, name, open).await,
            Commands::Search => search_notes(&config).await,
            Commands::List { json } => list_snippets(&config, json).await,
        }
    }
}

/// Pick snippets, fill their inputs and hand them to the sinks
async fn copy_snippet(config: &ResolvedConfig, print: bool, tmux: bool) -> Result<()> {
    let catalog = CatalogBuilder::new().build(&config.snippets_dir).await?;

    if catalog.is_empty() {
        eprintln!("No snippets found in {}", config.snippets_dir.display());
        return Ok(());
    }

    let labels = catalog.labels();
    let selected = {
        let preview = |i: usize| catalog.get(i).map(|s| s.content).unwrap_or_default();
        TerminalPicker::stdio().pick(&labels, &preview)?
    };

    let mut sinks: Vec<Box<dyn Sink>> = vec![Box::new(ClipboardSink::new())];
    if print {
        sinks.push(Box::new(StdoutSink));
    }
    if tmux {
        sinks.push(Box::new(TmuxSink::new()));
    }

    let mut prompt = TerminalPrompt::stdio();
    deliver_selection(&catalog, &selected, &mut prompt, &Renderer::new(), &sinks).await?;

    Ok(())
}

/// Create a note from the configured template
async fn add_note(config: &ResolvedConfig, name: Option<String>, open: bool) -> Result<()> {
    let name = match name {
        Some(name) => name.trim().to_string(),
        None => read_note_name()?,
    };

    let path = create_note(
        &config.inbox_dir,
        &name,
        &config.template,
        &Local::now(),
        &Renderer::new(),
    )
    .await?;

    if open {
        open_in_editor(&config.editor, &path).await?;
    } else {
        println!("Note created at {}", path.display());
    }

    Ok(())
}

fn read_note_name() -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "Name of new note file: ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read note name")?;
    Ok(line.trim().to_string())
}

/// Pick a tag and open the notes carrying it
async fn search_notes(config: &ResolvedConfig) -> Result<()> {
    let tags = collect_tags(&config.vault).await?;

    if tags.is_empty() {
        eprintln!("No tagged notes found in {}", config.vault.display());
        return Ok(());
    }

    let labels: Vec<String> = tags.iter().map(|t| t.name.clone()).collect();
    let preview = |i: usize| {
        let tag = &tags[i];
        let content = std::fs::read_to_string(&tag.path).unwrap_or_default();
        format!("{}\n{}", tag.filename, content)
    };
    let selected = TerminalPicker::stdio().pick(&labels, &preview)?;

    for index in selected {
        open_in_editor(&config.editor, &tags[index].path).await?;
    }

    Ok(())
}

/// Print the snippet catalog
async fn list_snippets(config: &ResolvedConfig, json: bool) -> Result<()> {
    let catalog = CatalogBuilder::new().build(&config.snippets_dir).await?;
    let snippets = catalog.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snippets)?);
        return Ok(());
    }

    if snippets.is_empty() {
        println!("No snippets found");
        return Ok(());
    }

    for snippet in &snippets {
        if snippet.has_inputs() {
            let inputs: Vec<&str> = snippet.inputs.iter().map(|i| i.name.as_str()).collect();
            println!("{} ({})", snippet.name, inputs.join(", "));
        } else {
            println!("{}", snippet.name);
        }
    }

    Ok(())
}
