//! The build pass: scan → enrich → emit.
//!
//! Produces an in-memory [`Site`] that the generator renders. Any error aborts
//! the whole pass; nothing is retried. [`check_site`] additionally plans the
//! HTML routes so `folio check` fails exactly where `folio build` would.

use crate::config::SiteConfig;
use crate::emit::{self, EmitError};
use crate::enrich::{self, EnrichedFields};
use crate::generate::{self, GenerateError};
use crate::scan::{self, ContentIndex, ScanError};
use crate::types::{ContentDocument, DocumentId, PageBinding};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error(transparent)]
    Routes(#[from] GenerateError),
}

/// Everything the generator needs, computed once per build.
///
/// Serializes to the `manifest.json` written by `folio scan`.
#[derive(Debug, Serialize)]
pub struct Site {
    pub index: ContentIndex,
    pub fields: BTreeMap<DocumentId, EnrichedFields>,
    pub bindings: Vec<PageBinding>,
}

impl Site {
    /// Document and enriched fields for `id`, if both exist.
    pub fn entry(&self, id: &DocumentId) -> Option<(&ContentDocument, &EnrichedFields)> {
        Some((self.index.get(id)?, self.fields.get(id)?))
    }
}

pub fn build_site(root: &Path, config: &SiteConfig) -> Result<Site, PipelineError> {
    let index = scan::scan(root, &config.content)?;
    let fields = enrich::enrich_all(&index.documents, config);
    let bindings = emit::emit_pages(&index)?;

    tracing::info!(
        documents = index.len(),
        pages = bindings.len(),
        "content pipeline complete"
    );

    Ok(Site {
        index,
        fields,
        bindings,
    })
}

/// Build the site and plan its routes without writing any output.
pub fn check_site(root: &Path, config: &SiteConfig) -> Result<Site, PipelineError> {
    let site = build_site(root, config)?;
    let plan = generate::plan_routes(&site, config)?;
    tracing::debug!(routes = plan.pages.len(), "routes planned");
    Ok(site)
}
