//! Template rendering for snippets and note templates.
//!
//! Templates use `{{ }}` placeholders rendered by MiniJinja with strict
//! undefined handling: referencing a key that was not resolved is an error,
//! never an empty string. Go-style dot references (`{{.name}}`) are accepted
//! and mean the same as `{{ name }}`.
//!
//! On top of MiniJinja's builtin filters (`upper`, `lower`, `title`, `trim`,
//! `replace`, `default`, `join`, ...) the environment provides:
//!
//! | Name | Kind | Example |
//! |------|------|---------|
//! | `snake` | filter | `{{ "Hello World" \| snake }}` → `hello_world` |
//! | `kebab` | filter | `{{ "Hello World" \| kebab }}` → `hello-world` |
//! | `camel` | filter | `{{ "hello world" \| camel }}` → `helloWorld` |
//! | `quote` / `squote` | filter | `{{ x \| quote }}` → `"x"` |
//! | `repeat` | filter | `{{ "-" \| repeat(3) }}` → `---` |
//! | `trunc` | filter | `{{ x \| trunc(8) }}` |
//! | `now` | function | `{{ now("%Y-%m-%d") }}` |
//! | `list` | function | `{{ list("a", "b") \| join(",") }}` |
//!
//! There is no loader, so templates cannot include files.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::Local;
use minijinja::value::{Rest, Value};
use minijinja::{Environment, Error, ErrorKind, UndefinedBehavior};
use regex::Regex;
use serde::Serialize;

use super::Snippet;

/// Largest output the `repeat` filter may produce, in bytes
pub const MAX_REPEAT_BYTES: usize = 1 << 20;

/// `{{.name` / `{{- .name` openings
static DOT_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(-?)(\s*)\.([A-Za-z_])").expect("dot reference regex"));

/// Errors that can occur while rendering
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),
}

/// Rewrite Go-style `{{.name}}` references to `{{ name }}` form
pub fn normalize_placeholders(template: &str) -> String {
    DOT_REF_RE.replace_all(template, "{{$1$2$3").into_owned()
}

/// Template renderer with the extended function library
pub struct Renderer {
    env: Environment<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Create a renderer with strict undefined handling and all helpers registered
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        register_helpers(&mut env);
        Self { env }
    }

    /// Render a snippet with resolved input values.
    ///
    /// A snippet without inputs is returned verbatim, placeholders included.
    pub fn render(
        &self,
        snippet: &Snippet,
        values: &HashMap<String, String>,
    ) -> Result<String, RenderError> {
        if !snippet.has_inputs() {
            return Ok(snippet.content.clone());
        }
        self.render_str(&snippet.content, values)
    }

    /// Compile and render an arbitrary template
    pub fn render_str<S: Serialize>(&self, template: &str, ctx: S) -> Result<String, RenderError> {
        let source = normalize_placeholders(template);
        Ok(self.env.render_str(&source, ctx)?)
    }
}

fn register_helpers(env: &mut Environment<'static>) {
    env.add_filter("snake", |value: String| -> String { join_words(&value, "_") });
    env.add_filter("kebab", |value: String| -> String { join_words(&value, "-") });
    env.add_filter("camel", |value: String| -> String { camel_case(&value) });
    env.add_filter("quote", |value: String| -> String { format!("\"{}\"", value) });
    env.add_filter("squote", |value: String| -> String { format!("'{}'", value) });
    env.add_filter("repeat", repeat);
    env.add_filter("trunc", |value: String, length: usize| -> String {
        value.chars().take(length).collect()
    });

    env.add_function("now", |format: Option<String>| -> Result<String, Error> {
        let format = format.unwrap_or_else(|| "%Y-%m-%d".to_string());
        let mut out = String::new();
        write!(out, "{}", Local::now().format(&format)).map_err(|_| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("invalid date format '{}'", format),
            )
        })?;
        Ok(out)
    });
    env.add_function("list", |items: Rest<Value>| -> Value { Value::from(items.0) });
}

fn repeat(value: String, count: usize) -> Result<String, Error> {
    match value.len().checked_mul(count) {
        Some(len) if len <= MAX_REPEAT_BYTES => Ok(value.repeat(count)),
        _ => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("repeat({}) exceeds {} bytes", count, MAX_REPEAT_BYTES),
        )),
    }
}

/// Split on non-alphanumerics and lower-to-upper case changes
fn words(value: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in value.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn join_words(value: &str, sep: &str) -> String {
    words(value).join(sep)
}

fn camel_case(value: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(value).iter().enumerate() {
        if i == 0 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
