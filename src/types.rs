//! Shared types passed between pipeline stages.
//!
//! Documents are produced once by [`scan`](crate::scan) and never mutated.
//! Everything downstream (slugs, enriched fields, bindings) refers back to a
//! document by its [`DocumentId`].

use crate::frontmatter::FrontMatter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stable identifier of a content document.
///
/// Derived from the document's path relative to the content root, so the same
/// file keeps the same id from one build to the next.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-level content directory a document lives in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Posts,
    /// Older layouts keep long-form writing under `articles/`.
    Articles,
    Projects,
    /// Singleton site pages (`pages/home/`, `pages/projects/`, ...).
    Pages,
    Other(String),
}

impl Category {
    /// Infer the category from a directory name. Matching is case-insensitive.
    pub fn from_dir_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "posts" => Category::Posts,
            "articles" => Category::Articles,
            "projects" => Category::Projects,
            "pages" => Category::Pages,
            _ => Category::Other(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Posts => "posts",
            Category::Articles => "articles",
            Category::Projects => "projects",
            Category::Pages => "pages",
            Category::Other(name) => name,
        }
    }

    /// Template used to render documents of this category as standalone
    /// pages, or `None` when the category does not produce pages.
    pub fn template(&self) -> Option<Template> {
        match self {
            Category::Posts => Some(Template::Post),
            Category::Articles => Some(Template::Article),
            _ => None,
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::from_dir_name(&name)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Markdown/MDX file discovered by the scanner.
#[derive(Debug, Clone, Serialize)]
pub struct ContentDocument {
    pub id: DocumentId,
    pub category: Category,
    /// Absolute (or root-joined) path of the source file.
    pub source_path: PathBuf,
    /// Path relative to the content root, always `/`-separated.
    pub relative_path: String,
    pub front_matter: FrontMatter,
    /// Raw body text following the front matter block.
    pub body: String,
}

/// Template a page binding is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Post,
    Article,
    Page,
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Template::Post => "post",
            Template::Article => "article",
            Template::Page => "page",
        };
        f.write_str(name)
    }
}

/// Canonical public URL path of a document, e.g. `/my-post/`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(pub(crate) String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last non-empty path segment (`/notes/rust-tips/` → `rust-tips`).
    pub fn last_segment(&self) -> &str {
        self.0.split('/').rfind(|s| !s.is_empty()).unwrap_or("")
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Instruction to the generator: render `document_id` at `path` with `template`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageBinding {
    pub path: Slug,
    pub template: Template,
    pub document_id: DocumentId,
}
