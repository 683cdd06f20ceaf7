//! Keyword-to-icon resolution for the guest menu.
//!
//! Menu entries are titled by staff in free text ("Wi-Fi & Internet",
//! "Restaurants nearby", ...). The icon shown next to each entry is picked by
//! matching the title against an ordered keyword list. The map is built once
//! from configuration and passed to whatever renders the menu.

use regex::RegexSet;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::ConfigError;

/// One keyword rule. Keywords match at the start of a word, case-insensitively,
/// so `sport` matches "Sports" and "water-sports" but not "transport".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRule {
    pub keyword: SmolStr,
    pub icon: SmolStr,
}

/// Serialized form of the icon map, as it appears in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconConfig {
    #[serde(default = "IconConfig::default_fallback")]
    pub fallback: SmolStr,
    #[serde(default)]
    pub rules: Vec<IconRule>,
}

impl IconConfig {
    fn default_fallback() -> SmolStr {
        SmolStr::new_static("info")
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        let rule = |keyword: &'static str, icon: &'static str| IconRule {
            keyword: SmolStr::new_static(keyword),
            icon: SmolStr::new_static(icon),
        };
        Self {
            fallback: Self::default_fallback(),
            rules: vec![
                rule("wifi", "wifi"),
                rule("wi-fi", "wifi"),
                rule("internet", "wifi"),
                rule("emergenc", "phone"),
                rule("rental", "bike"),
                rule("rent", "bike"),
                rule("sport", "dumbbell"),
                rule("restaurant", "utensils"),
                rule("breakfast", "coffee"),
                rule("chatbot", "message-circle"),
            ],
        }
    }
}

/// Compiled keyword-to-icon map. The first matching rule wins.
#[derive(Debug, Clone)]
pub struct IconMap {
    set: RegexSet,
    icons: Vec<SmolStr>,
    fallback: SmolStr,
}

impl IconMap {
    pub fn new(config: &IconConfig) -> Result<Self, ConfigError> {
        let patterns = config
            .rules
            .iter()
            .map(|r| format!(r"(?i)(^|[^\p{{Alphabetic}}]){}", regex::escape(r.keyword.trim())));
        let set = RegexSet::new(patterns).map_err(|e| ConfigError::Parse {
            path: "icons".into(),
            message: e.to_string(),
        })?;

        Ok(Self {
            set,
            icons: config.rules.iter().map(|r| r.icon.clone()).collect(),
            fallback: config.fallback.clone(),
        })
    }

    /// Pick the icon for a menu title.
    pub fn resolve(&self, title: &str) -> &str {
        self.resolve_match(title).unwrap_or(&self.fallback)
    }

    /// Like `resolve`, but `None` when no rule matched.
    pub fn resolve_match(&self, title: &str) -> Option<&str> {
        self.set
            .matches(title)
            .iter()
            .next()
            .map(|idx| self.icons[idx].as_str())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_map() -> IconMap {
        IconMap::new(&IconConfig::default()).unwrap()
    }

    #[test]
    fn test_matches_keyword_prefix() {
        let map = default_map();
        assert_eq!(map.resolve("Wi-Fi & Internet"), "wifi");
        assert_eq!(map.resolve("Water sports"), "dumbbell");
        assert_eq!(map.resolve("EMERGENCY numbers"), "phone");
    }

    #[test]
    fn test_does_not_match_inside_words() {
        let map = default_map();
        // "transport" contains "sport" but not at a word start
        assert_eq!(map.resolve_match("Transport"), None);
        assert_eq!(map.resolve("Transport"), "info");
    }

    #[test]
    fn test_first_rule_wins() {
        let config = IconConfig {
            fallback: "dot".into(),
            rules: vec![
                IconRule {
                    keyword: "bar".into(),
                    icon: "glass".into(),
                },
                IconRule {
                    keyword: "restaurant".into(),
                    icon: "utensils".into(),
                },
            ],
        };
        let map = IconMap::new(&config).unwrap();
        assert_eq!(map.resolve("Restaurant & bar"), "glass");
        assert_eq!(map.resolve("Spa"), "dot");
    }
}
