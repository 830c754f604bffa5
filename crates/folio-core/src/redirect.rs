//! Vanity URL redirects.
//!
//! Rules come from `[[redirects]]` in the site config. The build writes a
//! meta-refresh page per rule; the dev server answers with a real 307/308.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A single redirect rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    /// Site-relative path that triggers the redirect, e.g. `/x`.
    pub source: String,

    /// Absolute URL or site path to send the visitor to.
    pub destination: String,

    /// Permanent (308) or temporary (307).
    #[serde(default = "default_permanent")]
    pub permanent: bool,
}

fn default_permanent() -> bool {
    true
}

impl Redirect {
    /// Create a permanent redirect.
    pub fn permanent(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            permanent: true,
        }
    }

    /// Create a temporary redirect.
    pub fn temporary(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            permanent: false,
        }
    }

    /// HTTP status code for this rule.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        if self.permanent { 308 } else { 307 }
    }
}

/// Validated set of redirect rules keyed by normalized source path.
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    rules: Vec<Redirect>,
    index: HashMap<String, usize>,
}

impl RedirectTable {
    /// Build a table, rejecting relative or duplicate sources.
    pub fn new(rules: Vec<Redirect>) -> Result<Self> {
        let mut index = HashMap::with_capacity(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            if !rule.source.starts_with('/') {
                return Err(CoreError::redirect(format!(
                    "source `{}` must start with '/'",
                    rule.source
                )));
            }
            if rule.destination.trim().is_empty() {
                return Err(CoreError::redirect(format!(
                    "destination for `{}` is empty",
                    rule.source
                )));
            }

            let key = normalize(&rule.source);
            if index.insert(key.clone(), i).is_some() {
                return Err(CoreError::redirect(format!("duplicate source `{key}`")));
            }
        }

        Ok(Self { rules, index })
    }

    /// Find the rule for a request path. `/x` and `/x/` match the same rule.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&Redirect> {
        self.index.get(&normalize(path)).map(|&i| &self.rules[i])
    }

    /// All rules in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Redirect> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_rules() -> Vec<Redirect> {
        vec![
            Redirect::permanent("/x", "https://x.com/bridgertower"),
            Redirect::permanent("/yt", "https://youtube.com/@bridgertower"),
            Redirect::permanent("/youtube", "https://youtube.com/@bridgertower"),
            Redirect::permanent("/linkedin", "https://linkedin.com/in/brijr"),
            Redirect::permanent("/github", "https://github.com/brijr"),
        ]
    }

    #[test]
    fn test_resolve_exact_and_trailing_slash() {
        let table = RedirectTable::new(site_rules()).expect("valid rules");

        let rule = table.resolve("/x").expect("rule for /x");
        assert_eq!(rule.destination, "https://x.com/bridgertower");
        assert_eq!(rule.status_code(), 308);

        assert_eq!(
            table.resolve("/github/").map(|r| r.destination.as_str()),
            Some("https://github.com/brijr")
        );
        assert!(table.resolve("/posts").is_none());
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_aliases_share_destination() {
        let table = RedirectTable::new(site_rules()).expect("valid rules");
        assert_eq!(
            table.resolve("/yt").map(|r| &r.destination),
            table.resolve("/youtube").map(|r| &r.destination)
        );
    }

    #[test]
    fn test_temporary_status() {
        assert_eq!(Redirect::temporary("/tmp", "/posts").status_code(), 307);
    }

    #[test]
    fn test_relative_source_rejected() {
        let err = RedirectTable::new(vec![Redirect::permanent("x", "https://x.com")]).unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let err = RedirectTable::new(vec![
            Redirect::permanent("/x", "https://x.com/a"),
            Redirect::temporary("/x/", "https://x.com/b"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate source `/x`"));
    }

    #[test]
    fn test_empty_destination_rejected() {
        assert!(RedirectTable::new(vec![Redirect::permanent("/x", " ")]).is_err());
    }

    #[test]
    fn test_permanent_defaults_to_true() {
        let rule: Redirect =
            toml::from_str("source = \"/x\"\ndestination = \"https://x.com\"").expect("parse");
        assert!(rule.permanent);
    }
}
