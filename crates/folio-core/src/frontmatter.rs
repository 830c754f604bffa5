//! Page metadata extraction from a document's leading front-matter block.

use std::{collections::BTreeMap, path::Path};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, Result};

/// Typed metadata for a single document.
///
/// Built once per document by [`parse_meta`] and never mutated afterwards.
/// `title` is always present and trimmed; a document without one is rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    /// Page title.
    pub title: String,

    /// Short description shown next to the title and in meta tags.
    pub description: Option<String>,

    /// Publication date.
    pub date: Option<DateTime<Utc>>,

    /// Last updated date.
    pub updated: Option<DateTime<Utc>>,

    /// Whether this is a draft.
    pub draft: bool,

    /// Tags for the page.
    pub tags: Vec<String>,

    /// Sort weight for undated pages.
    pub weight: i32,

    /// Any other keys found in the block.
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Front-matter as written by the author, before validation.
#[derive(Debug, Default, Deserialize)]
struct RawMeta {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_date")]
    date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_date")]
    updated: Option<DateTime<Utc>>,

    #[serde(default)]
    draft: bool,

    #[serde(default)]
    tags: Vec<String>,

    #[serde(default)]
    weight: i32,

    #[serde(default, flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

/// Delimiter types for front-matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML front-matter delimited by `---`.
    Yaml,
    /// TOML front-matter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into front-matter and body.
///
/// Both delimiters must sit on their own line. Returns `None` when the
/// document does not open with a complete block.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };
    let delimiter = format.delimiter();

    let first_newline = content.find('\n')?;
    if content[..first_newline].trim_end() != delimiter {
        return None;
    }

    let rest = &content[first_newline + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = rest[..offset].trim();
            let body = rest[offset + line.len()..].trim_start();
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse the leading metadata block of a document.
///
/// Returns the validated metadata and the remaining body source. Fails if the
/// block is malformed or `title` is absent or blank, including documents with
/// no block at all.
pub fn parse_meta(content: &str, path: &Path) -> Result<(PageMeta, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Err(CoreError::frontmatter(
            path,
            "title is required (no front-matter block found)",
        ));
    };

    let raw: RawMeta = if fm_str.is_empty() {
        RawMeta::default()
    } else {
        match format {
            FrontmatterFormat::Yaml => serde_yaml::from_str(fm_str)
                .map_err(|e| CoreError::frontmatter(path, e.to_string()))?,
            FrontmatterFormat::Toml => {
                toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
            }
        }
    };

    let meta = PageMeta::from_raw(raw, path)?;
    Ok((meta, body.to_string()))
}

impl PageMeta {
    fn from_raw(raw: RawMeta, path: &Path) -> Result<Self> {
        let title = raw
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::frontmatter(path, "title is required"))?
            .to_string();

        let description = raw
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            title,
            description,
            date: raw.date,
            updated: raw.updated,
            draft: raw.draft,
            tags: raw.tags,
            weight: raw.weight,
            extra: raw.extra,
        })
    }

    /// Most recent of `updated` and `date`.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated.or(self.date)
    }
}

/// Parse a front-matter date: RFC 3339, or a bare `YYYY-MM-DD` at midnight UTC.
pub fn parse_date(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid date `{raw}`, expected YYYY-MM-DD or RFC 3339"))
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_date(&raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
