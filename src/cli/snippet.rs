//! Snippet delivery: resolve, render, hand off.

use anyhow::{Context, Result};
use tracing::debug;

use crate::adapters::Sink;
use crate::snippet::{resolve_inputs, Catalog, Prompt, Renderer};

/// Render every selected snippet and deliver it to all `sinks`.
///
/// Inputs are asked for right before each render, in declaration order.
/// Returns the rendered texts in selection order.
pub async fn deliver_selection(
    catalog: &Catalog,
    selected: &[usize],
    prompt: &mut dyn Prompt,
    renderer: &Renderer,
    sinks: &[Box<dyn Sink>],
) -> Result<Vec<String>> {
    let mut rendered = Vec::with_capacity(selected.len());

    for &index in selected {
        let snippet = catalog
            .get(index)
            .with_context(|| format!("No snippet at index {}", index))?;

        let values = resolve_inputs(&snippet, prompt)?;
        let text = renderer
            .render(&snippet, &values)
            .with_context(|| format!("Failed to render snippet '{}'", snippet.name))?;

        for sink in sinks {
            debug!(sink = sink.name(), snippet = %snippet.name, "Delivering snippet");
            sink.deliver(&text)
                .await
                .with_context(|| format!("Failed to deliver snippet to {}", sink.name()))?;
        }

        rendered.push(text);
    }

    Ok(rendered)
}
