//! # Folio
//!
//! A static site generator for a personal blog and portfolio. The content
//! directory is the data source: the first directory level decides whether a
//! Markdown/MDX file is a post, an article, a project entry or a site page.
//!
//! # Architecture: Scan → Enrich → Emit → Generate
//!
//! ```text
//! 1. Scan      content/   →  ContentIndex      (files + parsed front matter)
//! 2. Enrich    documents  →  EnrichedFields    (reading time, excerpt, HTML)
//! 3. Emit      documents  →  PageBindings      (slug + template per routed doc)
//! 4. Generate  Site       →  dist/             (final HTML)
//! ```
//!
//! Stages 1-3 run in [`pipeline::build_site`] and produce an in-memory
//! [`pipeline::Site`], which `folio scan` also writes out as
//! `manifest.json` for inspection. Every stage is a function of its inputs,
//! so unit tests exercise each one without the others.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the content directory, parses front matter, assigns document ids |
//! | [`frontmatter`] | YAML front matter splitting and parsing |
//! | [`slug`] | Derives the public URL path of a document from its file path |
//! | [`enrich`] | Computed fields: reading time, excerpt, rendered HTML, canonical URL |
//! | [`emit`] | Decides which documents become pages, rejects slug collisions |
//! | [`pipeline`] | Runs scan, enrich and emit into a [`pipeline::Site`] |
//! | [`view`] | Listing queries and template-facing views (posts, projects, pages) |
//! | [`generate`] | Renders the HTML site with Maud |
//! | [`config`] | `config.toml` loading, validation, merging, and theme CSS |
//! | [`types`] | Shared types passed between stages |
//! | [`output`] | CLI output formatting |
//!
//! # Slugs
//!
//! A document's slug is its path below the category directory with the
//! extension and any trailing `index` removed, each segment slugified to
//! lowercase ASCII and dashes:
//!
//! ```text
//! posts/hello-world/index.mdx  →  /hello-world/
//! posts/notes/Rust-Tips.md     →  /notes/rust-tips/
//! ```
//!
//! Two routed documents deriving the same slug fail the build.

pub mod config;
pub mod emit;
pub mod enrich;
pub mod frontmatter;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod slug;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
