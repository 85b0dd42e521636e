//! Find/replace rules applied to titles and descriptions after extraction.
//!
//! A rule is gated by a regex on the original scrape URL. The replacement
//! itself is a literal substring replace, never a regex.

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, ScrapeError};

/// Rule as written in configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RuleConfig {
    /// Regex tested against the scrape URL.
    pub url_matches: String,
    pub find: String,
    #[serde(default)]
    pub replace_with: String,
}

/// A compiled replacement rule.
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    url_matches: Regex,
    find: String,
    replace_with: String,
}

impl ReplacementRule {
    pub fn new(
        url_matches: &str,
        find: impl Into<String>,
        replace_with: impl Into<String>,
    ) -> Result<Self> {
        let pattern = Regex::new(url_matches).map_err(|source| ScrapeError::InvalidPattern {
            pattern: url_matches.to_string(),
            source,
        })?;
        Ok(Self {
            url_matches: pattern,
            find: find.into(),
            replace_with: replace_with.into(),
        })
    }

    pub fn from_config(config: &RuleConfig) -> Result<Self> {
        Self::new(&config.url_matches, &config.find, &config.replace_with)
    }

    pub fn applies_to(&self, url: &str) -> bool {
        self.url_matches.is_match(url)
    }

    /// Replace every occurrence of `find` in `field` if `url` is in scope.
    ///
    /// Returns whether the rule fired (regardless of whether text changed).
    pub fn apply(&self, url: &str, field: &mut String) -> bool {
        if !self.applies_to(url) {
            return false;
        }
        if !self.find.is_empty() && field.contains(&self.find) {
            *field = field.replace(&self.find, &self.replace_with);
        }
        true
    }
}

/// Apply `rules` in order; each sees the output of the previous one.
pub fn apply_rules(rules: &[ReplacementRule], url: &str, field: &mut String) {
    for rule in rules {
        if rule.apply(url, field) {
            tracing::trace!(pattern = %rule.url_matches, find = %rule.find, "Replacement rule fired");
        }
    }
}
