//! Front matter extraction and typed parsing.
//!
//! A document may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Hello World
//! date: 2021-01-01
//! tags: [react]
//! ---
//! Body text starts here.
//! ```
//!
//! The block is parsed into [`FrontMatter`], a record of optional fields with
//! explicit defaults. Keys the record does not know about are kept in
//! [`FrontMatter::extra`] rather than rejected: authors add ad-hoc keys per
//! document and templates may still want them.
//!
//! A file that does not start with `---` has no front matter; the whole file is
//! body. A block that is opened but malformed is an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

const FENCE: &str = "---";

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front matter block is not closed with `---`")]
    Unterminated,
    #[error("invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Author-declared document fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    /// Ordered tags. Missing, `null`, or empty all mean "no tags".
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintained: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Heading of a singleton page (`pages/home`, `pages/projects`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheader: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Split raw file contents into the front matter source and the body.
///
/// Returns `Ok((None, content))` when the file has no front matter block.
pub fn split(content: &str) -> Result<(Option<&str>, &str), FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(first_line_end) = content.find('\n') else {
        // A lone `---` line still opens a block that never closes.
        return if content.trim_end() == FENCE {
            Err(FrontMatterError::Unterminated)
        } else {
            Ok((None, content))
        };
    };
    if content[..first_line_end].trim_end() != FENCE {
        return Ok((None, content));
    }

    let rest = &content[first_line_end + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }
    Err(FrontMatterError::Unterminated)
}

/// Parse the YAML between the fences. An empty block yields defaults.
pub fn parse(yaml: &str) -> Result<FrontMatter, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Split and parse in one step.
pub fn extract(content: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    match split(content)? {
        (Some(yaml), body) => Ok((parse(yaml)?, body)),
        (None, body) => Ok((FrontMatter::default(), body)),
    }
}

/// Local date-time layouts accepted besides RFC 3339.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Accepts `2021-01-01`, an RFC 3339 timestamp, or a local date-time such as
/// `2021-01-01T10:00:00` / `2021-01-01 10:00:00`. Only the date is kept.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_date(raw.trim())
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date `{}`, expected YYYY-MM-DD", raw.trim())))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|dt| dt.date())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsField {
    One(String),
    Many(Vec<String>),
}

/// `tags: react` is accepted as a one-element list.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TagsField>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(TagsField::One(tag)) => vec![tag],
        Some(TagsField::Many(tags)) => tags,
    })
}
