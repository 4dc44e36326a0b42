//! CLI output formatting for every command.
//!
//! Output is information-first: each document leads with its positional index
//! and title, with the source file and derived route shown as indented
//! context lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Posts (2 documents)
//! 001 Hello World
//!     Source: posts/hello-world/index.mdx
//!     Slug: /hello-world/
//! 002 Work in progress (draft)
//!     Source: posts/wip.md
//!
//! Pages (1 document)
//! 001 home
//!     Source: pages/home/index.md
//! ```
//!
//! ## Routes
//!
//! ```text
//! /hello-world/ → post
//!     Source: posts/hello-world/index.mdx
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! Posts → posts/index.html
//! Hello World → hello-world/index.html
//!
//! Generated 3 listings, 1 post, 0 articles, 1 page
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::generate::{GenerateReport, PageKind};
use crate::pipeline::Site;
use crate::scan::ContentIndex;
use crate::slug;
use crate::types::{ContentDocument, Template};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Display name of a document: title, then header, then file-derived name.
fn display_title(doc: &ContentDocument) -> String {
    let fm = &doc.front_matter;
    fm.title
        .as_deref()
        .or(fm.header.as_deref())
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let slug = slug::slug_of(&doc.relative_path);
            match slug.last_segment() {
                "" => doc.category.to_string(),
                segment => segment.to_string(),
            }
        })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the content inventory grouped by category.
pub fn format_scan_output(index: &ContentIndex) -> Vec<String> {
    let mut lines = Vec::new();

    for category in index.categories() {
        let docs = index.list_documents(&category);
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!(
            "{} ({})",
            capitalize(category.as_str()),
            plural(docs.len(), "document", "documents")
        ));

        for (i, doc) in docs.iter().enumerate() {
            let draft = if doc.front_matter.draft { " (draft)" } else { "" };
            lines.push(format!("{} {}{}", format_index(i + 1), display_title(doc), draft));
            lines.push(format!("    Source: {}", doc.relative_path));
            if !doc.front_matter.draft && doc.category.template().is_some() {
                lines.push(format!("    Slug: {}", slug::slug_of(&doc.relative_path)));
            }
            if let Some(date) = doc.front_matter.date {
                lines.push(format!("    Date: {}", date));
            }
        }
    }

    if lines.is_empty() {
        lines.push(format!("No content found in {}", index.root.display()));
    }
    lines
}

pub fn print_scan_output(index: &ContentIndex) {
    for line in format_scan_output(index) {
        println!("{}", line);
    }
}

// ============================================================================
// Routes output
// ============================================================================

/// Format the page bindings, one route per entry.
pub fn format_routes_output(site: &Site) -> Vec<String> {
    let mut lines = Vec::new();
    for binding in &site.bindings {
        lines.push(format!("{} \u{2192} {}", binding.path, binding.template));
        if let Some(doc) = site.index.get(&binding.document_id) {
            lines.push(format!("    Source: {}", doc.relative_path));
        }
    }
    lines.push(format!(
        "{} from {}",
        plural(site.bindings.len(), "route", "routes"),
        plural(site.index.len(), "document", "documents")
    ));
    lines
}

pub fn print_routes_output(site: &Site) {
    for line in format_routes_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

/// Format the generated pages, title first, followed by `→` and the file.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .map(|page| format!("{} \u{2192} {}", page.title, page.file.display()))
        .collect();

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}, {}",
        plural(
            report.count(PageKind::Home) + report.count(PageKind::Listing),
            "listing",
            "listings"
        ),
        plural(report.count(PageKind::Document(Template::Post)), "post", "posts"),
        plural(
            report.count(PageKind::Document(Template::Article)),
            "article",
            "articles"
        ),
        plural(report.count(PageKind::Document(Template::Page)), "page", "pages"),
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
