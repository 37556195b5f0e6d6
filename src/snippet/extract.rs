//! Snippet extraction from markdown text.
//!
//! A snippet file is plain markdown: level-3 headings name the snippets and
//! fenced code blocks carry their bodies. An optional `INPUTS:` block right
//! before a fence declares the template parameters of that body:
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
//! Headers and bodies are collected independently and zipped by position.
//! A document whose headers and fences are out of step will pair names
//! with unrelated bodies; only a count mismatch is reported.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::{Input, Snippet};

/// `### name` at the start of a line (leading indentation allowed)
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*### (.*)$").expect("header regex"));

/// Optional `INPUTS:` block followed by a fenced block.
///
/// Group 1 is the declaration lines of the input block, group 2 the body.
static BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ms)(?:^INPUTS:[ \t]*\n((?:[ \t]*-[ \t]+\w+[ \t]*(?::[^\n]*)?\n)+))?^[ \t]*```[\w+.-]*[ \t]*\n(.*?)^[ \t]*```[ \t]*$",
    )
    .expect("body regex")
});

/// One `- name` or `- name: default` declaration line
static INPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*-[ \t]+(\w+)[ \t]*(?::(.*))?$").expect("input regex")
});

/// Header and body counts of a file that did not line up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMismatch {
    /// File the counts were taken from
    pub source: String,

    /// Number of `###` headers found
    pub headers: usize,

    /// Number of fenced bodies found
    pub bodies: usize,
}

impl std::fmt::Display for CountMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "snippet file '{}' malformed: {} headers, {} snippets",
            self.source, self.headers, self.bodies
        )
    }
}

/// Result of extracting one file
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Snippets in document order
    pub snippets: Vec<Snippet>,

    /// Set when the header and body counts differ
    pub mismatch: Option<CountMismatch>,
}

/// Extract every snippet of `content`.
///
/// `source` only labels the mismatch warning. Never fails: a malformed file
/// yields the `min(headers, bodies)` leading pairs.
pub fn extract(content: &str, source: &str) -> Extraction {
    let normalized;
    let content = if content.contains('\r') {
        normalized = content.replace("\r\n", "\n");
        normalized.as_str()
    } else {
        content
    };

    let headers: Vec<&str> = HEADER_RE
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .collect();

    let bodies: Vec<(Option<&str>, &str)> = BODY_RE
        .captures_iter(content)
        .filter_map(|c| {
            let body = c.get(2)?.as_str();
            Some((c.get(1).map(|m| m.as_str()), body))
        })
        .collect();

    let mismatch = if headers.len() != bodies.len() {
        warn!(
            file = source,
            headers = headers.len(),
            snippets = bodies.len(),
            "Snippet file malformed: number of headers doesn't match number of snippets"
        );
        Some(CountMismatch {
            source: source.to_string(),
            headers: headers.len(),
            bodies: bodies.len(),
        })
    } else {
        None
    };

    let snippets = headers
        .into_iter()
        .zip(bodies)
        .map(|(name, (inputs, body))| Snippet {
            name: name.to_string(),
            content: body.trim().to_string(),
            inputs: inputs.map(parse_inputs).unwrap_or_default(),
        })
        .collect();

    Extraction { snippets, mismatch }
}

/// Split an `INPUTS:` block into declarations, in order.
///
/// `- name` has no default, `- name:` has an empty one.
pub fn parse_inputs(block: &str) -> Vec<Input> {
    INPUT_RE
        .captures_iter(block)
        .filter_map(|c| {
            let name = c.get(1)?.as_str().trim();
            let default = c.get(2).map(|m| m.as_str().trim().to_string());
            Some(Input {
                name: name.to_string(),
                default,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FENCE: &str = "```";

    fn doc(parts: &[&str]) -> String {
        parts.join("\n").replace("~~~", FENCE)
    }

    #[test]
    fn test_extract_plain_snippets_in_order() {
        let content = doc(&[
            "# My snippets",
            "",
            "### list files",
            "~~~bash",
            "ls -la",
            "~~~",
            "",
            "### disk usage",
            "~~~",
            "du -sh *",
            "~~~",
        ]);

        let result = extract(&content, "shell.md");

        assert!(result.mismatch.is_none());
        assert_eq!(result.snippets.len(), 2);
        assert_eq!(result.snippets[0].name, "list files");
        assert_eq!(result.snippets[0].content, "ls -la");
        assert!(result.snippets[0].inputs.is_empty());
        assert_eq!(result.snippets[1].name, "disk usage");
        assert_eq!(result.snippets[1].content, "du -sh *");
    }

    #[test]
    fn test_extract_inputs_with_and_without_defaults() {
        let content = doc(&[
            "### ssh tunnel",
            "INPUTS:",
            "- host",
            "- port: 8080 ",
            "-   user :  root",
            "- empty:",
            "~~~sh",
            "ssh -L {{.port}}:localhost:{{.port}} {{.user}}@{{.host}}",
            "~~~",
        ]);

        let result = extract(&content, "net.md");
        let snippet = &result.snippets[0];

        let names: Vec<_> = snippet.inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["host", "port", "user", "empty"]);
        assert_eq!(snippet.inputs[0].default, None);
        assert_eq!(snippet.inputs[1].default.as_deref(), Some("8080"));
        assert_eq!(snippet.inputs[2].default.as_deref(), Some("root"));
        assert_eq!(snippet.inputs[3].default.as_deref(), Some(""));
    }

    #[test]
    fn test_inputs_block_must_touch_the_fence() {
        let content = doc(&[
            "### loose",
            "INPUTS:",
            "- name",
            "",
            "some prose in between",
            "~~~",
            "{{.name}}",
            "~~~",
        ]);

        let result = extract(&content, "loose.md");
        assert_eq!(result.snippets.len(), 1);
        assert!(result.snippets[0].inputs.is_empty());
    }

    #[test]
    fn test_body_is_trimmed_but_inner_lines_kept() {
        let content = doc(&["### block", "~~~", "", "  first", "second  ", "", "~~~"]);

        let result = extract(&content, "block.md");
        assert_eq!(result.snippets[0].content, "first\nsecond");
    }

    #[test]
    fn test_more_headers_than_bodies() {
        let content = doc(&["### one", "~~~", "1", "~~~", "### two", "### three"]);

        let result = extract(&content, "short.md");

        assert_eq!(result.snippets.len(), 1);
        let mismatch = result.mismatch.unwrap();
        assert_eq!(mismatch.source, "short.md");
        assert_eq!(mismatch.headers, 3);
        assert_eq!(mismatch.bodies, 1);
        assert!(mismatch.to_string().contains("3 headers"));
    }

    #[test]
    fn test_more_bodies_than_headers() {
        let content = doc(&["### only", "~~~", "a", "~~~", "~~~", "b", "~~~"]);

        let result = extract(&content, "long.md");
        assert_eq!(result.snippets.len(), 1);
        assert_eq!(result.snippets[0].content, "a");
        assert_eq!(result.mismatch.unwrap().bodies, 2);
    }

    #[test]
    fn test_positional_pairing_not_structural() {
        // Bodies are paired with headers by index only.
        let content = doc(&["### a", "### b", "~~~", "first", "~~~", "~~~", "second", "~~~"]);

        let result = extract(&content, "zip.md");
        assert!(result.mismatch.is_none());
        assert_eq!(result.snippets[0].name, "a");
        assert_eq!(result.snippets[0].content, "first");
        assert_eq!(result.snippets[1].name, "b");
        assert_eq!(result.snippets[1].content, "second");
    }

    #[test]
    fn test_other_heading_levels_ignored() {
        let content = doc(&["## section", "#### deep", "###no-space", "  ### indented  ", "~~~", "x", "~~~"]);

        let result = extract(&content, "levels.md");
        assert_eq!(result.snippets.len(), 1);
        assert_eq!(result.snippets[0].name, "indented");
    }

    #[test]
    fn test_no_headers_is_silent() {
        let result = extract("just some text\n", "empty.md");
        assert!(result.snippets.is_empty());
        assert!(result.mismatch.is_none());
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = doc(&["### win", "INPUTS:", "- a: 1", "~~~", "{{.a}}", "~~~", ""]).replace('\n', "\r\n");

        let result = extract(&content, "win.md");
        assert_eq!(result.snippets.len(), 1);
        assert_eq!(result.snippets[0].name, "win");
        assert_eq!(result.snippets[0].content, "{{.a}}");
        assert_eq!(result.snippets[0].inputs[0].default.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_inputs_skips_non_declarations() {
        let inputs = parse_inputs("- a\nnot an input\n- b: two words\n");
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[1].name, "b");
        assert_eq!(inputs[1].default.as_deref(), Some("two words"));
    }
}
