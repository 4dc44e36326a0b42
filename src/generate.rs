//! HTML site generation.
//!
//! Final stage of the build. Materializes every page binding plus the listing
//! pages into static HTML.
//!
//! ## Generated Pages
//!
//! ```text
//! dist/
//! ├── index.html                 # Home: header from pages/home, latest posts
//! ├── posts/index.html           # All posts, newest first
//! ├── articles/index.html        # Only when articles exist
//! ├── projects/index.html        # Projects, header from pages/projects
//! ├── about/index.html           # Any other singleton page under pages/
//! └── hello-world/index.html     # One per page binding
//! ```
//!
//! Generation runs in two steps. [`plan_routes`] builds the view models and
//! the route table without touching the filesystem; `folio check` stops
//! there. [`generate`] renders the plan. Every route is written exactly once:
//! a binding whose slug lands on a listing route (e.g. a post at
//! `posts/projects.md`) is an error rather than a silent overwrite.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolation is escaped except rendered Markdown bodies. Theme colours
//! and font come from config as CSS custom properties.

use crate::config::{self, SiteConfig};
use crate::pipeline::Site;
use crate::slug::slug_of;
use crate::types::Template;
use crate::view::{self, PostView, ProjectView, SitePage};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Route {route} is produced by both the {first} and the {second}")]
    RouteConflict {
        route: String,
        first: PageKind,
        second: PageKind,
    },
}

/// Singleton pages that only feed listing headers and get no page of their own.
const LISTING_PAGES: [&str; 2] = ["home", "projects"];

const CSS_STATIC: &str = include_str!("../static/style.css");

/// What kind of page lives at a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Listing,
    Document(Template),
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageKind::Home => f.write_str("home page"),
            PageKind::Listing => f.write_str("listing page"),
            PageKind::Document(Template::Page) => f.write_str("site page"),
            PageKind::Document(template) => write!(f, "{template}"),
        }
    }
}

/// Which view model a planned page is rendered from.
#[derive(Debug, Clone, Copy)]
enum PageSource {
    Home,
    Listing(Template),
    Projects,
    SitePage(usize),
    Post(usize),
    Article(usize),
}

/// One page of the site, routed but not yet rendered.
#[derive(Debug, Clone)]
pub struct PlannedPage {
    pub route: String,
    pub title: String,
    pub kind: PageKind,
    source: PageSource,
}

/// View models plus a conflict-free route table.
#[derive(Debug)]
pub struct SitePlan {
    pub pages: Vec<PlannedPage>,
    posts: Vec<PostView>,
    articles: Vec<PostView>,
    projects: Vec<ProjectView>,
    singles: Vec<SitePage>,
}

impl SitePlan {
    fn single(&self, name: &str) -> Option<&SitePage> {
        self.singles.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub route: String,
    pub title: String,
    pub kind: PageKind,
    /// Output file relative to the output directory.
    pub file: PathBuf,
}

#[derive(Debug, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
}

impl GenerateReport {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

#[derive(Debug, Clone)]
struct NavLink {
    label: String,
    href: String,
}

/// Shared state for every renderer: config, stylesheet and navigation.
struct RenderContext<'a> {
    config: &'a SiteConfig,
    css: String,
    nav: Vec<NavLink>,
}

/// Build the view models and route table for `site`.
///
/// Fails with [`GenerateError::RouteConflict`] when two pages would be
/// written to the same route.
pub fn plan_routes(site: &Site, config: &SiteConfig) -> Result<SitePlan, GenerateError> {
    let posts = view::post_listing(site, Template::Post, config);
    let articles = view::post_listing(site, Template::Article, config);
    let projects = view::project_listing(site);
    let singles = view::site_pages(site);

    let mut pages = vec![
        PlannedPage {
            route: "/".to_string(),
            title: config.site.title.clone(),
            kind: PageKind::Home,
            source: PageSource::Home,
        },
        PlannedPage {
            route: "/posts/".to_string(),
            title: "Posts".to_string(),
            kind: PageKind::Listing,
            source: PageSource::Listing(Template::Post),
        },
    ];
    if !articles.is_empty() {
        pages.push(PlannedPage {
            route: "/articles/".to_string(),
            title: "Articles".to_string(),
            kind: PageKind::Listing,
            source: PageSource::Listing(Template::Article),
        });
    }
    pages.push(PlannedPage {
        route: "/projects/".to_string(),
        title: "Projects".to_string(),
        kind: PageKind::Listing,
        source: PageSource::Projects,
    });
    for (i, page) in singles.iter().enumerate() {
        if LISTING_PAGES.contains(&page.name.as_str()) {
            continue;
        }
        pages.push(PlannedPage {
            route: slug_of(&format!("pages/{}/index", page.name)).to_string(),
            title: page_title(page),
            kind: PageKind::Document(Template::Page),
            source: PageSource::SitePage(i),
        });
    }
    for (i, post) in posts.iter().enumerate() {
        pages.push(PlannedPage {
            route: post.slug.clone(),
            title: post.title.clone(),
            kind: PageKind::Document(Template::Post),
            source: PageSource::Post(i),
        });
    }
    for (i, article) in articles.iter().enumerate() {
        pages.push(PlannedPage {
            route: article.slug.clone(),
            title: article.title.clone(),
            kind: PageKind::Document(Template::Article),
            source: PageSource::Article(i),
        });
    }

    check_routes(&pages)?;

    Ok(SitePlan {
        pages,
        posts,
        articles,
        projects,
        singles,
    })
}

pub fn generate(
    site: &Site,
    output_dir: &Path,
    config: &SiteConfig,
) -> Result<GenerateReport, GenerateError> {
    let plan = plan_routes(site, config)?;
    let ctx = RenderContext {
        config,
        css: format!("{}\n\n{}", config::generate_theme_css(&config.theme), CSS_STATIC),
        nav: nav_links(&plan),
    };

    fs::create_dir_all(output_dir)?;
    let mut report = GenerateReport::default();
    for page in &plan.pages {
        let html = render_planned(&ctx, &plan, page);
        let file = route_to_file(&page.route);
        let path = output_dir.join(&file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html.into_string())?;
        tracing::debug!(route = %page.route, kind = %page.kind, "page written");
        report.pages.push(GeneratedPage {
            route: page.route.clone(),
            title: page.title.clone(),
            kind: page.kind,
            file,
        });
    }

    Ok(report)
}

fn check_routes(pages: &[PlannedPage]) -> Result<(), GenerateError> {
    let mut seen: BTreeMap<&str, PageKind> = BTreeMap::new();
    for page in pages {
        if let Some(first) = seen.insert(page.route.as_str(), page.kind) {
            return Err(GenerateError::RouteConflict {
                route: page.route.clone(),
                first,
                second: page.kind,
            });
        }
    }
    Ok(())
}

/// `/` → `index.html`, `/a/b/` → `a/b/index.html`.
fn route_to_file(route: &str) -> PathBuf {
    route
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<PathBuf>()
        .join("index.html")
}

fn page_title(page: &SitePage) -> String {
    if page.header.is_empty() {
        capitalize(&page.name)
    } else {
        page.header.clone()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn nav_links(plan: &SitePlan) -> Vec<NavLink> {
    let mut links = vec![
        NavLink {
            label: "Posts".to_string(),
            href: "/posts/".to_string(),
        },
        NavLink {
            label: "Projects".to_string(),
            href: "/projects/".to_string(),
        },
    ];
    if !plan.articles.is_empty() {
        links.push(NavLink {
            label: "Articles".to_string(),
            href: "/articles/".to_string(),
        });
    }
    for page in &plan.pages {
        if let PageSource::SitePage(i) = page.source {
            links.push(NavLink {
                label: capitalize(&plan.singles[i].name),
                href: page.route.clone(),
            });
        }
    }
    links
}

fn render_planned(ctx: &RenderContext, plan: &SitePlan, page: &PlannedPage) -> Markup {
    match page.source {
        PageSource::Home => {
            let recent = &plan.posts[..plan.posts.len().min(ctx.config.home.recent_posts)];
            render_home(ctx, plan.single("home"), recent)
        }
        PageSource::Listing(Template::Article) => {
            render_post_listing(ctx, &page.title, &page.route, &plan.articles)
        }
        PageSource::Listing(_) => render_post_listing(ctx, &page.title, &page.route, &plan.posts),
        PageSource::Projects => render_project_listing(ctx, plan.single("projects"), &plan.projects),
        PageSource::SitePage(i) => render_site_page(ctx, &plan.singles[i], &page.route),
        PageSource::Post(i) => render_post(ctx, &plan.posts[i], Template::Post),
        PageSource::Article(i) => render_post(ctx, &plan.articles[i], Template::Article),
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Meta data for the document head.
struct Head<'a> {
    title: &'a str,
    description: &'a str,
    canonical: Option<&'a str>,
    og_type: &'a str,
}

/// Renders the base HTML document structure
fn base_document(ctx: &RenderContext, head: Head, current: &str, content: Markup) -> Markup {
    let site = &ctx.config.site;
    let full_title = if head.title == site.title {
        site.title.clone()
    } else {
        format!("{} | {}", head.title, site.title)
    };
    let description = if head.description.is_empty() {
        site.description.as_str()
    } else {
        head.description
    };
    let twitter_card = if site.image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };

    html! {
        (DOCTYPE)
        html lang=(site.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (full_title) }
                @if !description.is_empty() {
                    meta name="description" content=(description);
                    meta property="og:description" content=(description);
                    meta name="twitter:description" content=(description);
                }
                @if !site.author.is_empty() {
                    meta name="author" content=(site.author);
                }
                meta property="og:title" content=(head.title);
                meta property="og:type" content=(head.og_type);
                meta property="og:locale" content=(site.locale);
                @if let Some(url) = head.canonical {
                    link rel="canonical" href=(url);
                    meta property="og:url" content=(url);
                }
                @if let Some(image) = &site.image {
                    meta property="og:image" content=(image);
                    meta name="twitter:image" content=(image);
                }
                meta name="twitter:card" content=(twitter_card);
                meta name="twitter:title" content=(head.title);
                @if let Some(handle) = &site.twitter {
                    meta name="twitter:site" content=(handle);
                    meta name="twitter:creator" content=(handle);
                }
                style { (PreEscaped(&ctx.css)) }
            }
            body {
                a.skip-link href="#content" { "Skip to content" }
                (site_header(ctx, current))
                main #content { (content) }
                (site_footer(ctx))
            }
        }
    }
}

fn site_header(ctx: &RenderContext, current: &str) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (ctx.config.site.title) }
            nav.site-nav {
                ul {
                    @for link in &ctx.nav {
                        @let is_current = current.starts_with(&link.href);
                        li class=[is_current.then_some("current")] {
                            a href=(link.href) { (link.label) }
                        }
                    }
                }
            }
        }
    }
}

fn site_footer(ctx: &RenderContext) -> Markup {
    let site = &ctx.config.site;
    html! {
        footer.site-footer {
            @if !site.social.is_empty() {
                ul.social-links {
                    @for link in &site.social {
                        li {
                            a href=(link.url) target="_blank" rel="noopener noreferrer" { (link.label) }
                        }
                    }
                }
            }
            @if !site.author.is_empty() {
                p { "© " (site.author) }
            }
        }
    }
}

fn tag_list(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tags {
                @for tag in tags {
                    li.tag { (tag) }
                }
            }
        }
    }
}

fn post_meta(post: &PostView) -> Markup {
    html! {
        div.post-meta {
            @if !post.date.is_empty() {
                time { (post.date) }
            }
            span.reading-time { (post.reading_time) }
        }
    }
}

/// Post summaries. Condensed lists (home page) omit tags and excerpts.
fn post_list(posts: &[PostView], condensed: bool) -> Markup {
    html! {
        ul.post-list {
            @for post in posts {
                li {
                    @if condensed {
                        h3 { a href=(post.slug) { (post.title) } }
                    } @else {
                        h2 { a href=(post.slug) { (post.title) } }
                    }
                    (post_meta(post))
                    @if !condensed {
                        (tag_list(&post.tags))
                        @if !post.excerpt.is_empty() {
                            p.excerpt { (post.excerpt) }
                        }
                    }
                }
            }
        }
    }
}

fn project_list(projects: &[ProjectView]) -> Markup {
    html! {
        ul.project-list {
            @for project in projects {
                li {
                    @if let Some(link) = &project.link {
                        a.project-title href=(link) target="_blank" rel="noopener noreferrer" { (project.title) }
                    } @else {
                        span.project-title { (project.title) }
                    }
                    @match project.maintained {
                        Some(true) => span.badge.maintained { "maintained" },
                        Some(false) => span.badge.abandoned { "abandoned" },
                        None => {},
                    }
                    @if !project.description.is_empty() {
                        p { (project.description) }
                    }
                    (tag_list(&project.tags))
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home(ctx: &RenderContext, home: Option<&SitePage>, recent: &[PostView]) -> Markup {
    let site = &ctx.config.site;
    let head = Head {
        title: &site.title,
        description: home.map(|h| h.subheader.as_str()).unwrap_or(""),
        canonical: site.url.as_deref(),
        og_type: "website",
    };
    let content = html! {
        @if let Some(home) = home {
            @if !home.header.is_empty() {
                h1.page-title { (home.header) }
            }
            @if !home.subheader.is_empty() {
                p.subheader { (home.subheader) }
            }
            (PreEscaped(&home.body))
        }
        @if !recent.is_empty() {
            section.recent-posts {
                h2 { "Latest posts" }
                (post_list(recent, true))
                a href="/posts/" { "All posts →" }
            }
        }
    };
    base_document(ctx, head, "/", content)
}

fn render_post_listing(ctx: &RenderContext, heading: &str, route: &str, posts: &[PostView]) -> Markup {
    let head = Head {
        title: heading,
        description: "",
        canonical: None,
        og_type: "website",
    };
    let content = html! {
        h1.page-title { (heading) }
        @if posts.is_empty() {
            p { "Nothing here yet." }
        } @else {
            (post_list(posts, false))
        }
    };
    base_document(ctx, head, route, content)
}

fn render_project_listing(
    ctx: &RenderContext,
    page: Option<&SitePage>,
    projects: &[ProjectView],
) -> Markup {
    let heading = page
        .map(|p| p.header.as_str())
        .filter(|h| !h.is_empty())
        .unwrap_or("Projects");
    let subheader = page.map(|p| p.subheader.as_str()).unwrap_or("");
    let head = Head {
        title: "Projects",
        description: subheader,
        canonical: None,
        og_type: "website",
    };
    let content = html! {
        h1.page-title { (heading) }
        @if !subheader.is_empty() {
            p.subheader { (subheader) }
        }
        (project_list(projects))
    };
    base_document(ctx, head, "/projects/", content)
}

fn render_site_page(ctx: &RenderContext, page: &SitePage, route: &str) -> Markup {
    let title = page_title(page);
    let head = Head {
        title: &title,
        description: &page.subheader,
        canonical: None,
        og_type: "website",
    };
    let content = html! {
        h1.page-title { (title) }
        @if !page.subheader.is_empty() {
            p.subheader { (page.subheader) }
        }
        article.page { (PreEscaped(&page.body)) }
    };
    base_document(ctx, head, route, content)
}

/// Renders a post or article page.
fn render_post(ctx: &RenderContext, post: &PostView, template: Template) -> Markup {
    let head = Head {
        title: &post.title,
        description: &post.excerpt,
        canonical: post.canonical_url.as_deref(),
        og_type: "article",
    };
    let listing = match template {
        Template::Article => "/articles/",
        _ => "/posts/",
    };
    let content = html! {
        article class=(template.to_string()) {
            h1 { (post.title) }
            @if template == Template::Post {
                (post_meta(post))
                (tag_list(&post.tags))
            }
            (PreEscaped(&post.body))
        }
    };
    base_document(ctx, head, listing, content)
}

// ============================================================================
// Tests
// ============================================================================
