//! Template view models.
//!
//! Joins authored front matter with computed fields into the flat records the
//! generator renders. Defaulting happens here, once: a post without a title is
//! named after its slug, a post without a date shows an empty date, missing
//! tags are an empty list.

use crate::config::SiteConfig;
use crate::enrich::EnrichedFields;
use crate::pipeline::Site;
use crate::slug::slug_of;
use crate::types::{Category, ContentDocument, Template};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Everything a post or article template needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub title: String,
    /// Formatted with `site.date_format`; empty when the post has no date.
    pub date: String,
    pub tags: Vec<String>,
    pub reading_time: String,
    pub excerpt: String,
    pub slug: String,
    /// Rendered HTML.
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    /// Unformatted date, kept for ordering.
    #[serde(skip)]
    pub sort_date: Option<NaiveDate>,
}

impl PostView {
    pub fn build(doc: &ContentDocument, fields: &EnrichedFields, config: &SiteConfig) -> Self {
        let slug = slug_of(&doc.relative_path);
        let fm = &doc.front_matter;
        let title = fm
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| slug.last_segment().replace('-', " "));

        PostView {
            title,
            date: fm
                .date
                .map(|d| format_date(d, &config.site.date_format))
                .unwrap_or_default(),
            tags: fm.tags.clone(),
            reading_time: fields.reading_time.text.clone(),
            excerpt: fields.excerpt.clone(),
            slug: slug.to_string(),
            body: fields.body_html.clone(),
            canonical_url: fields.canonical_url.clone(),
            sort_date: fm.date,
        }
    }
}

/// A project entry on the projects listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectView {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// `None` when the author did not say.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintained: Option<bool>,
    pub tags: Vec<String>,
}

/// A singleton page under `pages/<name>/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitePage {
    pub name: String,
    pub header: String,
    pub subheader: String,
    pub body: String,
}

/// Format a date, falling back to ISO format if the pattern is unusable.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

/// Routed documents rendered with `template`, newest first.
///
/// Undated posts sort after dated ones; ties are broken by title.
pub fn post_listing(site: &Site, template: Template, config: &SiteConfig) -> Vec<PostView> {
    let mut posts: Vec<PostView> = site
        .bindings
        .iter()
        .filter(|b| b.template == template)
        .filter_map(|b| site.entry(&b.document_id))
        .map(|(doc, fields)| PostView::build(doc, fields, config))
        .collect();
    posts.sort_by(compare_newest_first);
    posts
}

fn compare_newest_first(a: &PostView, b: &PostView) -> Ordering {
    match (a.sort_date, b.sort_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.title.cmp(&b.title))
}

/// Projects sorted by title, case-insensitively.
pub fn project_listing(site: &Site) -> Vec<ProjectView> {
    let mut projects: Vec<ProjectView> = site
        .index
        .documents
        .iter()
        .filter(|d| d.category == Category::Projects && !d.front_matter.draft)
        .map(|doc| {
            let fm = &doc.front_matter;
            ProjectView {
                title: fm
                    .title
                    .clone()
                    .unwrap_or_else(|| slug_of(&doc.relative_path).last_segment().replace('-', " ")),
                description: fm.description.clone().unwrap_or_default(),
                link: fm.link.clone(),
                maintained: fm.maintained,
                tags: fm.tags.clone(),
            }
        })
        .collect();
    projects.sort_by(|a, b| {
        a.title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title))
    });
    projects
}

/// Look up the singleton page `pages/<name>/index.md` (or `pages/<name>.md`).
///
/// When a page directory holds several documents the `index` one wins.
pub fn site_page(site: &Site, name: &str) -> Option<SitePage> {
    let doc = site
        .index
        .documents
        .iter()
        .filter(|d| {
            d.category == Category::Pages
                && !d.front_matter.draft
                && page_name(&d.relative_path).eq_ignore_ascii_case(name)
        })
        .min_by_key(|d| !is_index_file(&d.relative_path))?;
    let fm = &doc.front_matter;
    Some(SitePage {
        name: name.to_string(),
        header: fm
            .header
            .clone()
            .or_else(|| fm.title.clone())
            .unwrap_or_default(),
        subheader: fm.subheader.clone().unwrap_or_default(),
        body: site
            .fields
            .get(&doc.id)
            .map(|f| f.body_html.clone())
            .unwrap_or_default(),
    })
}

/// Every non-draft singleton page, once per name, sorted by name.
pub fn site_pages(site: &Site) -> Vec<SitePage> {
    let names: BTreeSet<String> = site
        .index
        .documents
        .iter()
        .filter(|d| d.category == Category::Pages && !d.front_matter.draft)
        .map(|d| page_name(&d.relative_path).to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();
    names.iter().filter_map(|name| site_page(site, name)).collect()
}

/// `pages/home/index.md` → `home`, `pages/about.md` → `about`.
fn page_name(relative_path: &str) -> &str {
    let mut parts = relative_path.split('/').skip(1);
    let first = parts.next().unwrap_or("");
    match first.rsplit_once('.') {
        Some((stem, _)) if parts.next().is_none() => stem,
        _ => first,
    }
}

fn is_index_file(relative_path: &str) -> bool {
    relative_path
        .rsplit('/')
        .next()
        .and_then(|file| file.split('.').next())
        .is_some_and(|stem| stem.eq_ignore_ascii_case("index"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich_all;
    use crate::emit::derive_page_bindings;
    use crate::frontmatter::FrontMatter;
    use crate::scan::ContentIndex;
    use crate::test_helpers::{document, document_with, titled, words};
    use std::path::PathBuf;

    fn site_from(documents: Vec<ContentDocument>) -> Site {
        let config = SiteConfig::default();
        let fields = enrich_all(&documents, &config);
        let bindings = derive_page_bindings(&documents).unwrap();
        Site {
            index: ContentIndex {
                root: PathBuf::from("/content"),
                documents,
            },
            fields,
            bindings,
        }
    }

    fn dated(title: &str, date: &str) -> FrontMatter {
        FrontMatter {
            title: Some(title.to_string()),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            ..FrontMatter::default()
        }
    }

    #[test]
    fn hello_world_scenario() {
        let fm = FrontMatter {
            tags: vec!["react".to_string()],
            ..dated("Hello World", "2021-01-01")
        };
        let doc = document_with(Category::Posts, "posts/hello-world/index.mdx", fm, &words(400));
        let site = site_from(vec![doc]);
        let posts = post_listing(&site, Template::Post, &SiteConfig::default());

        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.slug, "/hello-world/");
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.date, "1 Jan 2021");
        assert_eq!(post.reading_time, "2 min read");
        assert_eq!(post.tags, vec!["react"]);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let doc = document(Category::Posts, "posts/quick-note.md", "");
        let site = site_from(vec![doc]);
        let post = &post_listing(&site, Template::Post, &SiteConfig::default())[0];
        assert_eq!(post.title, "quick note");
        assert_eq!(post.date, "");
        assert!(post.tags.is_empty());
        assert_eq!(post.reading_time, "1 min read");
        assert_eq!(post.excerpt, "");
    }

    #[test]
    fn posts_sorted_newest_first_undated_last() {
        let site = site_from(vec![
            document_with(Category::Posts, "posts/old.md", dated("Old", "2019-05-01"), ""),
            document_with(Category::Posts, "posts/none.md", titled("Undated"), ""),
            document_with(Category::Posts, "posts/new.md", dated("New", "2021-03-01"), ""),
        ]);
        let titles: Vec<String> = post_listing(&site, Template::Post, &SiteConfig::default())
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);
    }

    #[test]
    fn listing_filters_by_template() {
        let site = site_from(vec![
            document(Category::Posts, "posts/a.md", ""),
            document(Category::Articles, "articles/b.md", ""),
        ]);
        let config = SiteConfig::default();
        assert_eq!(post_listing(&site, Template::Post, &config).len(), 1);
        assert_eq!(post_listing(&site, Template::Article, &config).len(), 1);
    }

    #[test]
    fn custom_date_format() {
        let mut config = SiteConfig::default();
        config.site.date_format = "%Y/%m/%d".to_string();
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(format_date(date, &config.site.date_format), "2021/01/01");
    }

    #[test]
    fn projects_sorted_case_insensitively() {
        let project = |title: &str, maintained| FrontMatter {
            title: Some(title.to_string()),
            maintained: Some(maintained),
            ..FrontMatter::default()
        };
        let site = site_from(vec![
            document_with(Category::Projects, "projects/b.md", project("beta", true), ""),
            document_with(Category::Projects, "projects/a.md", project("Zeta", false), ""),
            document_with(Category::Projects, "projects/c.md", project("Alpha", true), ""),
        ]);
        let titles: Vec<String> = project_listing(&site).into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Alpha", "beta", "Zeta"]);
    }

    #[test]
    fn project_fields_pass_through() {
        let fm = FrontMatter {
            title: Some("Folio".to_string()),
            description: Some("Static sites".to_string()),
            link: Some("https://example.com/folio".to_string()),
            tags: vec!["rust".to_string()],
            ..FrontMatter::default()
        };
        let site = site_from(vec![document_with(Category::Projects, "projects/folio.md", fm, "")]);
        let project = &project_listing(&site)[0];
        assert_eq!(project.description, "Static sites");
        assert_eq!(project.link.as_deref(), Some("https://example.com/folio"));
        assert_eq!(project.maintained, None);
        assert_eq!(project.tags, vec!["rust"]);
    }

    #[test]
    fn site_page_looked_up_by_name() {
        let fm = FrontMatter {
            header: Some("Hi, I'm Praz".to_string()),
            subheader: Some("I build things".to_string()),
            ..FrontMatter::default()
        };
        let site = site_from(vec![
            document_with(Category::Pages, "pages/home/index.md", fm, "Welcome"),
            document(Category::Pages, "pages/about.md", "About me"),
        ]);
        let home = site_page(&site, "home").unwrap();
        assert_eq!(home.header, "Hi, I'm Praz");
        assert_eq!(home.subheader, "I build things");
        assert!(home.body.contains("Welcome"));

        let about = site_page(&site, "about").unwrap();
        assert!(about.body.contains("About me"));

        assert!(site_page(&site, "missing").is_none());
    }

    #[test]
    fn site_pages_lists_each_name_once() {
        let site = site_from(vec![
            document(Category::Pages, "pages/about.md", "About"),
            document(Category::Pages, "pages/home/index.md", "Home"),
            document(Category::Pages, "pages/home/extra.md", "More"),
        ]);
        let pages = site_pages(&site);
        let names: Vec<&str> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["about", "home"]);
        // index.md wins over its siblings
        assert!(pages[1].body.contains("Home"));
    }

    #[test]
    fn site_pages_merges_names_across_siblings() {
        let site = site_from(vec![
            document(Category::Pages, "pages/About.md", "Short"),
            document(Category::Pages, "pages/Contact.md", "Mail me"),
            document(Category::Pages, "pages/about/index.md", "Long"),
        ]);
        let pages = site_pages(&site);
        let names: Vec<&str> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["about", "contact"]);
        assert!(pages[0].body.contains("Long"));
    }

    #[test]
    fn page_name_extraction() {
        assert_eq!(page_name("pages/home/index.md"), "home");
        assert_eq!(page_name("pages/about.mdx"), "about");
        assert_eq!(page_name("pages/projects/intro.md"), "projects");
    }
}
