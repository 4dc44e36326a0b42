//! Shared test utilities.
//!
//! Builders for in-memory documents and helpers for laying out a content
//! directory inside a [`tempfile::TempDir`].

use std::path::Path;

use crate::frontmatter::FrontMatter;
use crate::scan::document_id;
use crate::types::{Category, ContentDocument};

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// A body of exactly `n` words.
pub fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

// =========================================================================
// In-memory documents
// =========================================================================

/// Document with empty front matter.
pub fn document(category: Category, relative_path: &str, body: &str) -> ContentDocument {
    document_with(category, relative_path, FrontMatter::default(), body)
}

pub fn document_with(
    category: Category,
    relative_path: &str,
    front_matter: FrontMatter,
    body: &str,
) -> ContentDocument {
    ContentDocument {
        id: document_id(relative_path),
        category,
        source_path: Path::new("/content").join(relative_path),
        relative_path: relative_path.to_string(),
        front_matter,
        body: body.to_string(),
    }
}

/// Front matter with just a title.
pub fn titled(title: &str) -> FrontMatter {
    FrontMatter {
        title: Some(title.to_string()),
        ..FrontMatter::default()
    }
}
