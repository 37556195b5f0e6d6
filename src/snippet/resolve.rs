//! Input resolution for parameterized snippets.

use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, Write};

use thiserror::Error;

use super::{Input, Snippet};

/// Errors that can occur while prompting
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to read value for \"{name}\": {source}")]
    Prompt {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Line prompt collaborator.
///
/// Returns the answer with surrounding whitespace removed; an empty string
/// means the user just pressed enter.
pub trait Prompt {
    fn ask(&mut self, input: &Input) -> io::Result<String>;
}

/// Prompt text shown for `input`
pub fn prompt_text(input: &Input) -> String {
    match input.default.as_deref() {
        Some(default) if !default.is_empty() => {
            format!("Please provide value for \"{}\" [{}]: ", input.name, default)
        }
        _ => format!("Please provide value for \"{}\": ", input.name),
    }
}

/// Prompt over a reader/writer pair (stdin/stderr by default)
pub struct TerminalPrompt<R = io::StdinLock<'static>, W = io::Stderr> {
    reader: R,
    writer: W,
}

impl TerminalPrompt {
    /// Prompt on the process terminal
    pub fn stdio() -> Self {
        Self {
            reader: io::stdin().lock(),
            writer: io::stderr(),
        }
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Prompt over arbitrary streams
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn ask(&mut self, input: &Input) -> io::Result<String> {
        write!(self.writer, "{}", prompt_text(input))?;
        self.writer.flush()?;

        // EOF reads as an empty answer
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// Prompt that replays canned answers, then answers empty
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Input names asked so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, input: &Input) -> io::Result<String> {
        self.asked.push(input.name.clone());
        Ok(self.answers.pop_front().unwrap_or_default().trim().to_string())
    }
}

/// Ask for every declared input of `snippet`, in declaration order.
///
/// An empty answer falls back to the input's default, or to the empty
/// string when there is none. No prompting happens for snippets without
/// inputs.
pub fn resolve_inputs(
    snippet: &Snippet,
    prompt: &mut dyn Prompt,
) -> Result<HashMap<String, String>, ResolveError> {
    let mut values = HashMap::with_capacity(snippet.inputs.len());

    for input in &snippet.inputs {
        let answer = prompt.ask(input).map_err(|source| ResolveError::Prompt {
            name: input.name.clone(),
            source,
        })?;

        let value = if answer.is_empty() {
            input.fallback().to_string()
        } else {
            answer
        };
        values.insert(input.name.clone(), value);
    }

    Ok(values)
}
