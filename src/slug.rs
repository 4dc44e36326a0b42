//! Canonical URL derivation.
//!
//! A slug is a pure function of a document's path relative to the content
//! root. The category directory is not part of the public URL and a trailing
//! `index` file names its parent directory:
//!
//! | Relative path | Slug |
//! |---------------|------|
//! | `posts/my-post/index.mdx` | `/my-post/` |
//! | `posts/Hello.md` | `/hello/` |
//! | `articles/2020/Recap.md` | `/2020/recap/` |
//! | `posts/index.md` | `/` |
//! | `posts/My Post.md` | `/my-post/` |
//! | `posts/Café Notes/index.md` | `/cafe-notes/` |
//!
//! Each segment goes through [`slug::slugify`]: non-ASCII text is
//! transliterated, everything is lower-cased, and runs of anything that is not
//! `[a-z0-9]` become a single `-`. A segment with nothing left is dropped.
//!
//! Singleton pages under `pages/` never get a slug; they are looked up by
//! category membership instead (see [`route_slug`]).

use crate::types::{Category, ContentDocument, Slug};

/// Derive the canonical public path for a content-root-relative path.
///
/// The result always starts and ends with `/`, contains only `[a-z0-9-/]` and
/// never contains `//`. Backslashes are treated as separators.
pub fn slug_of(relative_path: &str) -> Slug {
    let normalized = relative_path.replace('\\', "/");
    let mut segments: Vec<&str> = normalized
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    // First segment is the category directory
    if segments.len() > 1 {
        segments.remove(0);
    }

    if let Some(last) = segments.pop() {
        let stem = match last.rsplit_once('.') {
            Some((stem, _ext)) if !stem.is_empty() => stem,
            _ => last,
        };
        if !stem.eq_ignore_ascii_case("index") {
            segments.push(stem);
        }
    }

    let segments: Vec<String> = segments
        .iter()
        .map(|s| ::slug::slugify(s))
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        return Slug("/".to_string());
    }
    Slug(format!("/{}/", segments.join("/")))
}

/// Slug used for routing, or `None` for singleton pages.
pub fn route_slug(doc: &ContentDocument) -> Option<Slug> {
    match doc.category {
        Category::Pages => None,
        _ => Some(slug_of(&doc.relative_path)),
    }
}
