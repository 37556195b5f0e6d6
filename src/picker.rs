//! Interactive selection over a list of labels.
//!
//! The picker is a collaborator: callers hand it the labels (snippet names,
//! tags) and a preview callback, and get back the selected indices.

use std::io::{self, BufRead, Write};

use anyhow::Result;

/// Preview columns/rows shown under each match
const PREVIEW_WIDTH: usize = 72;
const PREVIEW_HEIGHT: usize = 4;

/// Selects entries from a list of labels
pub trait Picker {
    /// Return the indices (into `labels`) the user selected; empty when cancelled
    fn pick(&mut self, labels: &[String], preview: &dyn Fn(usize) -> String) -> Result<Vec<usize>>;
}

/// Cut `content` to what fits a `width` x `height` box.
///
/// Every character counts one column, a newline ends a row, and a row
/// wraps after `width` characters.
pub fn truncate_preview(width: usize, height: usize, content: &str) -> &str {
    if height == 0 {
        return "";
    }
    let width = width.max(1);
    let mut rows = 0;
    let mut column = 0;

    for (index, c) in content.char_indices() {
        if c == '\n' {
            rows += 1;
            column = 0;
        } else {
            column += 1;
            if column > width {
                rows += 1;
                column = 1;
            }
        }
        if rows == height {
            return &content[..index];
        }
    }
    content
}

/// Line-oriented picker over any reader/writer.
///
/// Each round lists the current matches with their number. The user types
/// one or more numbers to select, other text to filter the labels
/// (case-insensitive substring), or an empty line to cancel.
pub struct TerminalPicker<R = io::StdinLock<'static>, W = io::Stderr> {
    reader: R,
    writer: W,
}

impl TerminalPicker {
    /// Picker on the process terminal
    pub fn stdio() -> Self {
        Self {
            reader: io::stdin().lock(),
            writer: io::stderr(),
        }
    }
}

impl<R: BufRead, W: Write> TerminalPicker<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn show(
        &mut self,
        labels: &[String],
        matches: &[usize],
        preview: &dyn Fn(usize) -> String,
    ) -> io::Result<()> {
        for &index in matches {
            writeln!(self.writer, "{:>4}  {}", index + 1, labels[index])?;
            let text = preview(index);
            for line in truncate_preview(PREVIEW_WIDTH, PREVIEW_HEIGHT, &text).lines() {
                writeln!(self.writer, "        {}", line)?;
            }
        }
        write!(self.writer, "Select number(s) or type to filter: ")?;
        self.writer.flush()
    }
}

/// Numbers in `answer` that point at one of `matches`, or `None` if the
/// answer is not a list of numbers
fn parse_selection(answer: &str, labels_len: usize, matches: &[usize]) -> Option<Vec<usize>> {
    let mut selected = Vec::new();
    for token in answer.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        let number: usize = token.parse().ok()?;
        let index = number.checked_sub(1)?;
        if index < labels_len && matches.contains(&index) && !selected.contains(&index) {
            selected.push(index);
        }
    }
    Some(selected)
}

impl<R: BufRead, W: Write> Picker for TerminalPicker<R, W> {
    fn pick(&mut self, labels: &[String], preview: &dyn Fn(usize) -> String) -> Result<Vec<usize>> {
        let mut matches: Vec<usize> = (0..labels.len()).collect();

        loop {
            if matches.is_empty() {
                writeln!(self.writer, "No matches")?;
                matches = (0..labels.len()).collect();
                if matches.is_empty() {
                    return Ok(Vec::new());
                }
            }
            self.show(labels, &matches, preview)?;

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(Vec::new());
            }
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(Vec::new());
            }

            if let Some(selected) = parse_selection(answer, labels.len(), &matches) {
                if !selected.is_empty() {
                    return Ok(selected);
                }
                continue;
            }

            let query = answer.to_lowercase();
            matches.retain(|&i| labels[i].to_lowercase().contains(&query));
        }
    }
}
