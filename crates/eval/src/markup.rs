//! HTML documents: plain-text preview.

use anyhow::{Context, Result};
use regex::Regex;
use sandbox_console::ConsoleSink;

use crate::{EvalOutcome, Evaluator};

struct Patterns {
    hidden: Regex,
    breaks: Regex,
    items: Regex,
    tags: Regex,
}

impl Patterns {
    fn compile() -> Result<Self> {
        Ok(Self {
            hidden: Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<head\b[^>]*>.*?</head\s*>")
                .context("Failed to compile hidden-block regex")?,
            breaks: Regex::new(r"(?i)<\s*(br|hr)\b[^>]*>|</\s*(p|div|h[1-6]|li|tr|ul|ol|table|section|article|header|footer|pre|blockquote)\s*>")
                .context("Failed to compile line-break regex")?,
            items: Regex::new(r"(?i)<\s*li\b[^>]*>").context("Failed to compile list-item regex")?,
            tags: Regex::new(r"(?s)<[^>]*>").context("Failed to compile tag regex")?,
        })
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Render an HTML document as the text a reader would see.
pub fn html_to_text(source: &str) -> Result<String> {
    let p = Patterns::compile()?;
    let text = p.hidden.replace_all(source, "");
    let text = p.breaks.replace_all(&text, "\n");
    let text = p.items.replace_all(&text, "• ");
    let text = p.tags.replace_all(&text, "");
    let text = decode_entities(&text);

    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    Ok(lines.join("\n"))
}

/// Previews HTML as plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupEvaluator;

impl Evaluator for MarkupEvaluator {
    fn evaluate(&self, source: &str, _console: &ConsoleSink) -> EvalOutcome {
        match html_to_text(source) {
            Ok(text) => EvalOutcome::value(text),
            Err(e) => EvalOutcome::failure(format!("{:#}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_hidden_blocks() {
        let html = r#"<!DOCTYPE html>
<html>
  <head><title>Ignored</title><style>body { color: red; }</style></head>
  <body>
    <h1>Hello &amp; welcome</h1>
    <script>console.log("no")</script>
    <p>First <b>bold</b> line</p>
    <!-- note -->
    <ul><li>one</li><li>two</li></ul>
  </body>
</html>"#;
        assert_eq!(
            html_to_text(html).unwrap(),
            "Hello & welcome\n\nFirst bold line\n\n• one\n• two"
        );
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(html_to_text("just text").unwrap(), "just text");
        assert_eq!(html_to_text("").unwrap(), "");
    }
}
