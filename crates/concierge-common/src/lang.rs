//! Language codes used for page translation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::ConfigError;

/// A short language code such as `en`, `fr` or `pt-BR`.
///
/// Codes are stored lowercase except for a region suffix, which keeps
/// lookups stable no matter how the admin typed them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(SmolStr);

impl Language {
    /// Parse and normalize a language code.
    pub fn new(code: &str) -> Result<Self, ConfigError> {
        let code = code.trim();
        let (primary, region) = match code.split_once(['-', '_']) {
            Some((p, r)) => (p, Some(r)),
            None => (code, None),
        };

        let valid_primary =
            (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
        let valid_region = region.is_none_or(|r| {
            (2..=4).contains(&r.len()) && r.chars().all(|c| c.is_ascii_alphanumeric())
        });
        if !valid_primary || !valid_region {
            return Err(ConfigError::InvalidLanguage {
                code: code.to_string(),
            });
        }

        let normalized = match region {
            Some(r) => format!("{}-{}", primary.to_ascii_lowercase(), r.to_ascii_uppercase()),
            None => primary.to_ascii_lowercase(),
        };
        Ok(Self(SmolStr::new(normalized)))
    }

    /// Wrap a code that is already normalized.
    pub(crate) fn from_static(code: &'static str) -> Self {
        Self(SmolStr::new_static(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Language {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.0.to_string()
    }
}

/// Parse a comma-separated list such as `en,fr,de`.
pub fn parse_language_list(list: &str) -> Result<Vec<Language>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Language::new)
        .collect()
}
