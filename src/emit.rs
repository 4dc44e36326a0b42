//! Page binding emission.
//!
//! Decides which documents become standalone pages and with which template.
//! The work is split in two phases so the derivation can be tested without a
//! filesystem:
//!
//! 1. [`ContentSource::list_documents`]: query the content layer per category.
//! 2. [`derive_page_bindings`]: pure function from documents to bindings.
//!
//! [`emit_pages`] glues the two together and is what the build calls.

use crate::scan::ContentIndex;
use crate::slug::slug_of;
use crate::types::{Category, ContentDocument, PageBinding, Slug};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Categories whose documents are rendered as their own page.
pub const ROUTED_CATEGORIES: [Category; 2] = [Category::Posts, Category::Articles];

#[derive(Error, Debug)]
#[error("content query for `{category}` failed: {message}")]
pub struct QueryError {
    pub category: Category,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum EmitError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("Slug {slug} is derived by both {} and {}", first.display(), second.display())]
    SlugCollision {
        slug: Slug,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Anything that can answer "which documents are in this category".
pub trait ContentSource {
    fn list_documents(&self, category: &Category) -> Result<Vec<ContentDocument>, QueryError>;
}

impl ContentSource for ContentIndex {
    fn list_documents(&self, category: &Category) -> Result<Vec<ContentDocument>, QueryError> {
        Ok(ContentIndex::list_documents(self, category))
    }
}

/// Bindings for every routed, non-draft document, sorted by path.
///
/// Documents outside [`ROUTED_CATEGORIES`] are ignored. Two documents that
/// derive the same slug fail the whole derivation.
pub fn derive_page_bindings(docs: &[ContentDocument]) -> Result<Vec<PageBinding>, EmitError> {
    let mut by_slug: BTreeMap<Slug, (&ContentDocument, PageBinding)> = BTreeMap::new();

    for doc in docs {
        let Some(template) = doc.category.template() else {
            continue;
        };
        if doc.front_matter.draft {
            tracing::debug!(path = %doc.relative_path, "skipping draft");
            continue;
        }
        let path = slug_of(&doc.relative_path);
        if let Some((existing, _)) = by_slug.get(&path) {
            return Err(EmitError::SlugCollision {
                slug: path,
                first: existing.source_path.clone(),
                second: doc.source_path.clone(),
            });
        }
        let binding = PageBinding {
            path: path.clone(),
            template,
            document_id: doc.id.clone(),
        };
        by_slug.insert(path, (doc, binding));
    }

    Ok(by_slug.into_values().map(|(_, binding)| binding).collect())
}

/// Query every routed category from `source` and derive the bindings.
///
/// A failed query is reported and aborts emission before any binding is
/// produced.
pub fn emit_pages(source: &impl ContentSource) -> Result<Vec<PageBinding>, EmitError> {
    let mut docs = Vec::new();
    for category in &ROUTED_CATEGORIES {
        match source.list_documents(category) {
            Ok(found) => docs.extend(found),
            Err(err) => {
                tracing::error!(category = %category, error = %err, "loading documents for page generation failed");
                return Err(err.into());
            }
        }
    }
    let bindings = derive_page_bindings(&docs)?;
    tracing::debug!(count = bindings.len(), "page bindings emitted");
    Ok(bindings)
}
