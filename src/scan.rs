//! Content discovery.
//!
//! Stage 1 of the build. Walks the content root and turns every Markdown/MDX
//! file into a [`ContentDocument`], tagged with the category directory it
//! lives under.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml                   # Site configuration (optional)
//! ├── posts/                        # Routed, rendered with the post template
//! │   ├── hello-world/
//! │   │   └── index.mdx             # → /hello-world/
//! │   └── rust-tips.md              # → /rust-tips/
//! ├── articles/                     # Older layout, article template
//! ├── projects/                     # Listed on /projects/, no own page
//! │   └── folio.md
//! └── pages/                        # Singleton pages, looked up by name
//!     ├── home/index.md
//!     └── projects/index.md
//! ```
//!
//! Files directly in the content root have no category and are skipped.
//! Hidden files and directories are ignored.
//!
//! ## Validation
//!
//! Front matter is parsed during the scan. A malformed block fails the whole
//! scan with the offending path; there is no partial recovery.

use crate::config::ContentConfig;
use crate::frontmatter::{self, FrontMatterError};
use crate::types::{Category, ContentDocument, DocumentId};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Content root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Front matter error in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

/// Every document found under a content root, sorted by relative path.
#[derive(Debug, Clone, Serialize)]
pub struct ContentIndex {
    pub root: PathBuf,
    pub documents: Vec<ContentDocument>,
}

impl ContentIndex {
    /// Documents belonging to `category`, in path order.
    pub fn list_documents(&self, category: &Category) -> Vec<ContentDocument> {
        self.documents
            .iter()
            .filter(|d| &d.category == category)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&ContentDocument> {
        self.documents.iter().find(|d| &d.id == id)
    }

    /// Distinct categories present, sorted.
    pub fn categories(&self) -> Vec<Category> {
        self.documents
            .iter()
            .map(|d| d.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Scan `root` for content documents.
pub fn scan(root: &Path, content: &ContentConfig) -> Result<ContentIndex, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut documents = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_document_extension(entry.path(), content) {
            continue;
        }
        let Some(relative_path) = relative_path(root, entry.path()) else {
            continue;
        };
        let Some((dir, _)) = relative_path.split_once('/') else {
            tracing::debug!(path = %relative_path, "skipping document outside a category directory");
            continue;
        };
        let category = Category::from_dir_name(dir);

        documents.push(read_document(entry.path(), relative_path, category)?);
    }

    documents.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    tracing::debug!(count = documents.len(), root = %root.display(), "scan complete");

    Ok(ContentIndex {
        root: root.to_path_buf(),
        documents,
    })
}

fn read_document(
    path: &Path,
    relative_path: String,
    category: Category,
) -> Result<ContentDocument, ScanError> {
    let content = fs::read_to_string(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (front_matter, body) =
        frontmatter::extract(&content).map_err(|source| ScanError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(ContentDocument {
        id: document_id(&relative_path),
        category,
        source_path: path.to_path_buf(),
        relative_path,
        front_matter,
        body: body.to_string(),
    })
}

/// First 16 hex digits of the SHA-256 of the relative path.
pub fn document_id(relative_path: &str) -> DocumentId {
    let digest = Sha256::digest(relative_path.as_bytes());
    let hex = format!("{:x}", digest);
    DocumentId(hex[..16].to_string())
}

/// `/`-separated path of `path` relative to `root`.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn has_document_extension(path: &Path, content: &ContentConfig) -> bool {
    path.extension()
        .map(|e| content.accepts_extension(&e.to_string_lossy()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    fn scan_default(root: &Path) -> Result<ContentIndex, ScanError> {
        scan(root, &ContentConfig::default())
    }

    #[test]
    fn finds_documents_in_category_directories() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/hello-world/index.mdx", "---\ntitle: Hello\n---\nHi");
        write_file(tmp.path(), "posts/rust.md", "Body");
        write_file(tmp.path(), "projects/folio.md", "---\ntitle: Folio\n---\n");
        write_file(tmp.path(), "pages/home/index.md", "---\nheader: Hi\n---\n");

        let index = scan_default(tmp.path()).unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(index.list_documents(&Category::Posts).len(), 2);
        assert_eq!(index.list_documents(&Category::Projects).len(), 1);
        assert_eq!(index.list_documents(&Category::Pages).len(), 1);
    }

    #[test]
    fn ignores_non_document_files() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/a.md", "A");
        write_file(tmp.path(), "posts/cover.png", "png");
        write_file(tmp.path(), "config.toml", "");

        let index = scan_default(tmp.path()).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/LOUD.MD", "A");
        let index = scan_default(tmp.path()).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn root_level_documents_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "README.md", "Not content");
        write_file(tmp.path(), "posts/a.md", "A");
        let index = scan_default(tmp.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.documents[0].relative_path, "posts/a.md");
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/.draft.md", "A");
        write_file(tmp.path(), ".cache/posts/b.md", "B");
        write_file(tmp.path(), "posts/c.md", "C");
        let index = scan_default(tmp.path()).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn unknown_directory_becomes_other_category() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "notes/a.md", "A");
        let index = scan_default(tmp.path()).unwrap();
        assert_eq!(index.categories(), vec![Category::Other("notes".to_string())]);
    }

    #[test]
    fn body_excludes_front_matter() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/a.md", "---\ntitle: A\ntags: [rust]\n---\nThe body\n");
        let index = scan_default(tmp.path()).unwrap();
        let doc = &index.documents[0];
        assert_eq!(doc.body, "The body\n");
        assert_eq!(doc.front_matter.title.as_deref(), Some("A"));
        assert_eq!(doc.front_matter.tags, vec!["rust"]);
    }

    #[test]
    fn malformed_front_matter_fails_with_path() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/good.md", "---\ntitle: Good\n---\n");
        write_file(tmp.path(), "posts/bad.md", "---\ntitle: [oops\n---\n");

        let err = scan_default(tmp.path()).unwrap_err();
        match &err {
            ScanError::FrontMatter { path, .. } => assert!(path.ends_with("posts/bad.md")),
            other => panic!("expected front matter error, got {other:?}"),
        }
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn non_utf8_document_fails_with_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("posts/latin1.md");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"caf\xe9").unwrap();

        let err = scan_default(tmp.path()).unwrap_err();
        match &err {
            ScanError::Read { path, .. } => assert!(path.ends_with("posts/latin1.md")),
            other => panic!("expected read error, got {other:?}"),
        }
        assert!(err.to_string().contains("latin1.md"));
    }

    #[test]
    fn unterminated_front_matter_fails() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/open.md", "---\ntitle: Open\n");
        assert!(matches!(
            scan_default(tmp.path()),
            Err(ScanError::FrontMatter {
                source: FrontMatterError::Unterminated,
                ..
            })
        ));
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan_default(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn documents_sorted_by_relative_path() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "projects/z.md", "");
        write_file(tmp.path(), "posts/b.md", "");
        write_file(tmp.path(), "posts/a.md", "");
        let index = scan_default(tmp.path()).unwrap();
        let paths: Vec<&str> = index.documents.iter().map(|d| d.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["posts/a.md", "posts/b.md", "projects/z.md"]);
    }

    #[test]
    fn document_ids_are_stable_and_distinct() {
        assert_eq!(document_id("posts/a.md"), document_id("posts/a.md"));
        assert_ne!(document_id("posts/a.md"), document_id("posts/b.md"));
        assert_eq!(document_id("posts/a.md").as_str().len(), 16);
    }

    #[test]
    fn lookup_by_id() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/a.md", "A");
        let index = scan_default(tmp.path()).unwrap();
        let id = document_id("posts/a.md");
        assert_eq!(index.get(&id).unwrap().relative_path, "posts/a.md");
    }

    #[test]
    fn custom_extensions() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/a.md", "A");
        write_file(tmp.path(), "posts/b.markdown", "B");
        let content = ContentConfig {
            extensions: vec!["markdown".to_string()],
            ..ContentConfig::default()
        };
        let index = scan(tmp.path(), &content).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.documents[0].relative_path, "posts/b.markdown");
    }
}
