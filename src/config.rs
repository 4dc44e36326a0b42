//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root next to the category directories:
//!
//! ```text
//! content/
//! ├── config.toml
//! ├── posts/
//! ├── projects/
//! └── pages/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Portfolio"
//! description = ""
//! author = ""
//! # url = "https://example.com"   # enables canonical URLs
//! date_format = "%-d %b %Y"        # 1 Jan 2021
//! lang = "en"
//! locale = "en_GB"                 # og:locale
//! # twitter = "handle"             # twitter:site / twitter:creator
//! # image = "https://example.com/banner.png"
//!
//! # [[site.social]]                # footer profile links
//! # label = "GitHub"
//! # url = "https://github.com/example"
//!
//! [content]
//! extensions = ["md", "mdx"]
//! words_per_minute = 200
//! excerpt_length = 140
//!
//! [home]
//! recent_posts = 5
//!
//! [theme]
//! font = "Montserrat"
//!
//! [theme.colors.light]
//! background = "#ffffff"
//! text = "#1a202c"
//! text_muted = "#4a5568"
//! brand = "#2b6cb0"
//! border = "#e2e8f0"
//!
//! [theme.colors.dark]
//! background = "#1a202c"
//! text = "#edf2f7"
//! text_muted = "#a0aec0"
//! brand = "#90cdf4"
//! border = "#2d3748"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Colour scheme and font are plain configuration handed to the generator;
//! nothing about the theme is process-global.
//!
//! Unknown keys are rejected to catch typos early.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide metadata used in titles, meta tags and canonical URLs.
    pub site: SiteMetadata,
    /// Content discovery and enrichment settings.
    pub content: ContentConfig,
    /// Home page settings.
    pub home: HomeConfig,
    /// Colour schemes and font.
    pub theme: ThemeConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "content.words_per_minute must be greater than 0".into(),
            ));
        }
        if self.content.excerpt_length == 0 {
            return Err(ConfigError::Validation(
                "content.excerpt_length must be greater than 0".into(),
            ));
        }
        if self.content.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "content.extensions must not be empty".into(),
            ));
        }
        if StrftimeItems::new(&self.site.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Validation(format!(
                "site.date_format is not a valid strftime pattern: `{}`",
                self.site.date_format
            )));
        }
        let urls = self
            .site
            .url
            .iter()
            .map(|url| ("site.url", url))
            .chain(self.site.image.iter().map(|url| ("site.image", url)))
            .chain(self.site.social.iter().map(|link| ("site.social.url", &link.url)));
        for (key, url) in urls {
            if !is_http_url(url) {
                return Err(ConfigError::Validation(format!(
                    "{key} must start with http:// or https://, got `{url}`"
                )));
            }
        }
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    /// Public base URL. Canonical URLs are only emitted when this is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// chrono `strftime` pattern for displayed dates.
    pub date_format: String,
    /// `<html lang>` attribute.
    pub lang: String,
    /// OpenGraph locale, e.g. `en_GB`.
    pub locale: String,
    /// Twitter handle without `@`, used for `twitter:site`/`twitter:creator`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    /// Absolute URL of the default share image (`og:image`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Profile links shown in the footer.
    pub social: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    /// Visible label, e.g. `GitHub`.
    pub label: String,
    pub url: String,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: String::new(),
            url: None,
            date_format: "%-d %b %Y".to_string(),
            lang: "en".to_string(),
            locale: "en_GB".to_string(),
            twitter: None,
            image: None,
            social: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// File extensions (without dot, case-insensitive) treated as documents.
    pub extensions: Vec<String>,
    /// Average reading speed used for reading-time estimates.
    pub words_per_minute: u32,
    /// Maximum excerpt length in characters.
    pub excerpt_length: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string(), "mdx".to_string()],
            words_per_minute: 200,
            excerpt_length: 140,
        }
    }
}

impl ContentConfig {
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    /// Number of latest posts listed on the home page.
    pub recent_posts: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self { recent_posts: 5 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel enrichment workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Body font family.
    pub font: String,
    pub colors: ColorConfig,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            font: "Montserrat".to_string(),
            colors: ColorConfig::default(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Dates, reading times, subheaders.
    pub text_muted: String,
    /// Accent used for links and heading underlines.
    pub brand: String,
    pub border: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1a202c".to_string(),
            text_muted: "#4a5568".to_string(),
            brand: "#2b6cb0".to_string(),
            border: "#e2e8f0".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#1a202c".to_string(),
            text: "#edf2f7".to_string(),
            text_muted: "#a0aec0".to_string(),
            brand: "#90cdf4".to_string(),
            border: "#2d3748".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site metadata
# ---------------------------------------------------------------------------
[site]
title = "Portfolio"
description = ""
author = ""

# Public base URL. When set, every routed document gets a canonical URL.
# url = "https://example.com"

# How dates are displayed (chrono strftime syntax). Default: 1 Jan 2021
date_format = "%-d %b %Y"

# Document language and OpenGraph locale.
lang = "en"
locale = "en_GB"

# Twitter handle (without @) for twitter:site / twitter:creator meta tags.
# twitter = "PrazDevs"

# Default share image for og:image / twitter:image.
# image = "https://example.com/images/banner.png"

# Profile links rendered in the footer. Repeat the block for each link.
# [[site.social]]
# label = "GitHub"
# url = "https://github.com/example"

# ---------------------------------------------------------------------------
# Content
# ---------------------------------------------------------------------------
[content]
# File extensions treated as documents.
extensions = ["md", "mdx"]

# Average reading speed for the "<n> min read" estimate.
words_per_minute = 200

# Maximum excerpt length in characters (cut on a word boundary).
excerpt_length = 140

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[home]
# Number of latest posts listed on the home page.
recent_posts = 5

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
# Body font family. "OpenDyslexic" is a good accessible alternative.
font = "Montserrat"

[theme.colors.light]
background = "#ffffff"
text = "#1a202c"
text_muted = "#4a5568"
brand = "#2b6cb0"
border = "#e2e8f0"

[theme.colors.dark]
background = "#1a202c"
text = "#edf2f7"
text_muted = "#a0aec0"
brand = "#90cdf4"
border = "#2d3748"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel enrichment workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    let colors = &theme.colors;
    format!(
        r#":root {{
    --font-body: "{font}", sans-serif;
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-brand: {light_brand};
    --color-border: {light_border};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-brand: {dark_brand};
        --color-border: {dark_border};
    }}
}}"#,
        font = theme.font,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_brand = colors.light.brand,
        light_border = colors.light.border,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_brand = colors.dark.brand,
        dark_border = colors.dark.border,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.content.words_per_minute, 200);
        assert_eq!(config.content.excerpt_length, 140);
        assert_eq!(config.content.extensions, vec!["md", "mdx"]);
        assert_eq!(config.home.recent_posts, 5);
        assert_eq!(config.theme.font, "Montserrat");
        assert!(config.site.url.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[theme.colors.light]
background = "#fafafa"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.theme.colors.light.background, "#fafafa");
        assert_eq!(config.theme.colors.light.text, "#1a202c");
        assert_eq!(config.theme.colors.dark.background, "#1a202c");
        assert_eq!(config.content.words_per_minute, 200);
    }

    #[test]
    fn accepts_extension_ignores_case() {
        let content = ContentConfig::default();
        assert!(content.accepts_extension("MDX"));
        assert!(content.accepts_extension("md"));
        assert!(!content.accepts_extension("txt"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Portfolio");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[site]
title = "praz.dev"
url = "https://praz.dev"

[content]
words_per_minute = 250
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "praz.dev");
        assert_eq!(config.site.url.as_deref(), Some("https://praz.dev"));
        assert_eq!(config.content.words_per_minute, 250);
        // Unspecified values keep their defaults
        assert_eq!(config.content.excerpt_length, 140);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[content]\nwords_per_minut = 10\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[images]\nquality = 90\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_words_per_minute() {
        let mut config = SiteConfig::default();
        config.content.words_per_minute = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("words_per_minute"));
    }

    #[test]
    fn validate_zero_excerpt_length() {
        let mut config = SiteConfig::default();
        config.content.excerpt_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_extensions() {
        let mut config = SiteConfig::default();
        config.content.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_url_scheme() {
        let mut config = SiteConfig::default();
        config.site.url = Some("praz.dev".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.site.url = Some("https://praz.dev".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_date_format() {
        let mut config = SiteConfig::default();
        config.site.date_format = "%Q".to_string();
        assert!(config.validate().is_err());
        config.site.date_format = "%Y-%m-%d".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[content]\nexcerpt_length = 0\n",
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[content]
words_per_minute = 200
excerpt_length = 140
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[content]\nexcerpt_length = 80\n").unwrap();
        let merged = merge_toml(base, overlay);
        let content = merged.get("content").unwrap();
        assert_eq!(content.get("excerpt_length").unwrap().as_integer(), Some(80));
        assert_eq!(
            content.get("words_per_minute").unwrap().as_integer(),
            Some(200)
        );
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str(r#"extensions = ["md", "mdx"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"extensions = ["md"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("extensions").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn resolve_config_with_no_overlay() {
        let base = stock_defaults_value().unwrap();
        let config = resolve_config(base, None).unwrap();
        assert_eq!(config.content.words_per_minute, 200);
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.site.date_format, "%-d %b %Y");
        assert_eq!(config.content.words_per_minute, 200);
        assert_eq!(config.content.excerpt_length, 140);
        assert_eq!(config.home.recent_posts, 5);
        assert_eq!(config.theme.colors.dark.brand, "#90cdf4");
        assert_eq!(config.processing.max_processes, None);
        assert_eq!(config.site.locale, "en_GB");
        assert!(config.site.social.is_empty());
    }

    #[test]
    fn social_links_parse() {
        let overlay: toml::Value = toml::from_str(
            r#"
[site]
twitter = "PrazDevs"

[[site.social]]
label = "GitHub"
url = "https://github.com/prazdevs"
"#,
        )
        .unwrap();
        let config = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap();
        assert_eq!(config.site.twitter.as_deref(), Some("PrazDevs"));
        assert_eq!(
            config.site.social,
            vec![SocialLink {
                label: "GitHub".to_string(),
                url: "https://github.com/prazdevs".to_string(),
            }]
        );
    }

    #[test]
    fn social_link_must_be_http() {
        let mut config = SiteConfig::default();
        config.site.social.push(SocialLink {
            label: "Mail".to_string(),
            url: "mailto:me@example.com".to_string(),
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.social.url"));
    }

    // =========================================================================
    // Processing / CSS
    // =========================================================================

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_never_zero() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn theme_css_includes_font_and_dark_mode() {
        let mut theme = ThemeConfig::default();
        theme.font = "OpenDyslexic".to_string();
        let css = generate_theme_css(&theme);
        assert!(css.contains(r#"--font-body: "OpenDyslexic""#));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains("--color-brand: #2b6cb0"));
    }
}
