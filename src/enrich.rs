//! Computed per-document fields.
//!
//! Everything here is derived from a document's body and the site config;
//! nothing is authored. Enrichment never fails: an empty body yields a
//! one-minute reading time and an empty excerpt.
//!
//! ## Word count
//!
//! Words are whitespace-delimited tokens of the body's *text content*. The
//! body is parsed as CommonMark so emphasis markers, link targets, heading
//! hashes and the like do not count. MDX `import`/`export` lines and inline
//! HTML/JSX tags are dropped as well.
//!
//! ## Excerpt
//!
//! The plain text of the first paragraph, cut on a word boundary once it
//! exceeds `content.excerpt_length` characters.

use crate::config::SiteConfig;
use crate::slug;
use crate::types::{ContentDocument, DocumentId};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html as md_html};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Estimated reading time, e.g. `2 min read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingTime {
    pub minutes: u32,
    pub words: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedFields {
    pub reading_time: ReadingTime,
    /// Plain text, never HTML. Empty when the body has no paragraph.
    pub excerpt: String,
    /// Rendered body.
    pub body_html: String,
    /// Absolute URL of the routed page when `site.url` is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

/// Compute the enriched fields of one document.
pub fn enrich(doc: &ContentDocument, config: &SiteConfig) -> EnrichedFields {
    let markdown = strip_mdx_esm(&doc.body);
    let text = plain_text(&markdown);
    let words = text.split_whitespace().count();

    let canonical_url = match (&config.site.url, slug::route_slug(doc)) {
        (Some(base), Some(slug)) => Some(format!("{}{}", base.trim_end_matches('/'), slug)),
        _ => None,
    };

    EnrichedFields {
        reading_time: reading_time(words, config.content.words_per_minute),
        excerpt: excerpt(&markdown, config.content.excerpt_length),
        body_html: render_html(&markdown),
        canonical_url,
    }
}

/// Enrich every document in parallel. Documents are independent, so the
/// work is split across the rayon pool without coordination.
pub fn enrich_all(
    docs: &[ContentDocument],
    config: &SiteConfig,
) -> BTreeMap<DocumentId, EnrichedFields> {
    docs.par_iter()
        .map(|doc| (doc.id.clone(), enrich(doc, config)))
        .collect()
}

/// `ceil(words / wpm)`, never less than one minute.
pub fn reading_time(words: usize, words_per_minute: u32) -> ReadingTime {
    let wpm = (words_per_minute as usize).max(1);
    let minutes = words.div_ceil(wpm).max(1);
    let minutes = u32::try_from(minutes).unwrap_or(u32::MAX);
    ReadingTime {
        minutes,
        words,
        text: format!("{minutes} min read"),
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Render Markdown to HTML.
pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, markdown_options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut out, parser);
    out
}

/// Drop MDX module lines (`import ...`, `export ...`) outside code fences.
pub fn strip_mdx_esm(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut fence: Option<&str> = None;

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_start();
        match fence {
            Some(marker) => {
                if trimmed.starts_with(marker) {
                    fence = None;
                }
            }
            None => {
                if trimmed.starts_with("```") {
                    fence = Some("```");
                } else if trimmed.starts_with("~~~") {
                    fence = Some("~~~");
                } else if line.starts_with("import ") || line.starts_with("export ") {
                    continue;
                }
            }
        }
        out.push_str(line);
    }
    out
}

/// Text content of a Markdown document, block boundaries turned into spaces.
fn plain_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());
    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableCell,
            ) => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Plain text of the first non-empty paragraph, truncated to `max_chars`.
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    let mut in_paragraph = false;
    let mut current = String::new();

    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Start(Tag::Paragraph) => {
                in_paragraph = true;
                current.clear();
            }
            Event::End(TagEnd::Paragraph) => {
                in_paragraph = false;
                let paragraph = current.split_whitespace().collect::<Vec<_>>().join(" ");
                if !paragraph.is_empty() {
                    return truncate_words(&paragraph, max_chars);
                }
            }
            Event::Text(t) | Event::Code(t) if in_paragraph => current.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => current.push(' '),
            _ => {}
        }
    }
    String::new()
}

/// Cut `text` to at most `max_chars` characters on a word boundary, adding `…`.
fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let head = &text[..cut];
    // Back off to the last space unless the very next char is one
    let head = if text[cut..].starts_with(' ') {
        head
    } else {
        head.rfind(' ').map(|i| &head[..i]).unwrap_or(head)
    };
    format!("{}…", head.trim_end())
}
