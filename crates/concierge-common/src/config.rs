use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::icons::IconConfig;
use crate::lang::Language;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "CONCIERGE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Language the staff write pages in. Never sent to the translator.
    pub source: Language,
    /// Every language a page is published in, in display order.
    pub targets: Vec<Language>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        let lang = Language::from_static;
        Self {
            source: lang("es"),
            targets: vec![lang("es"), lang("en"), lang("fr"), lang("de"), lang("it")],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// URL of the hosted translate-page function.
    pub endpoint: String,
    /// Bearer key for the hosted backend.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Pause between consecutive translator calls.
    #[serde(default = "TranslationConfig::default_delay_ms")]
    pub delay_ms: u64,
    /// Per-request timeout applied by the HTTP client.
    #[serde(default = "TranslationConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TranslationConfig {
    /// Default pause between translator calls.
    pub const DEFAULT_DELAY_MS: u64 = 2000;

    fn default_delay_ms() -> u64 {
        Self::DEFAULT_DELAY_MS
    }

    fn default_timeout_secs() -> u64 {
        30
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:54321/functions/v1/translate-page".into(),
            api_key: None,
            delay_ms: Self::DEFAULT_DELAY_MS,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Cap on stored undo snapshots. `None` keeps everything.
    #[serde(default)]
    pub history_limit: Option<usize>,
    /// Width given to newly inserted images.
    #[serde(default = "EditorConfig::default_image_width")]
    pub default_image_width: SmolStr,
}

impl EditorConfig {
    fn default_image_width() -> SmolStr {
        SmolStr::new_static("100%")
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            default_image_width: Self::default_image_width(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub languages: LanguageConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub icons: IconConfig,
}

impl Config {
    /// Load from the file named by `CONCIERGE_CONFIG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).map_err(|_| ConfigError::MissingEnv {
            var: CONFIG_PATH_ENV,
        })?;
        FileStore::new(path).load()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        FileStore::new(path).load()
    }
}

/// Reads and writes a configuration file.
///
/// The format is picked from the file extension: `.toml` or `.json`.
/// `$NAME` references in the file are replaced with environment variables
/// before parsing, so secrets can stay out of the file.
pub struct FileStore {
    path: PathBuf,
}

enum Format {
    Toml,
    Json,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn format(&self) -> Result<Format, ConfigError> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Format::Toml),
            Some("json") => Ok(Format::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                path: self.path.clone(),
            }),
        }
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let format = self.format()?;
        let raw = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        let text = substitute_env(&raw, std::env::vars());

        let parsed = match format {
            Format::Toml => toml::from_str(&text).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(&text).map_err(|e| e.to_string()),
        };
        let config = parsed.map_err(|message| ConfigError::Parse {
            path: self.path.clone(),
            message,
        })?;

        tracing::debug!(path = %self.path.display(), "loaded config");
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let text = match self.format()? {
            Format::Toml => {
                toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        std::fs::write(&self.path, text).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Replace `$NAME` with the value of each given variable.
///
/// Longer names are substituted first so `$API_KEY_2` is not clobbered by
/// `$API_KEY`.
fn substitute_env(text: &str, vars: impl Iterator<Item = (String, String)>) -> String {
    let mut vars: Vec<_> = vars.collect();
    vars.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = text.to_string();
    for (k, v) in vars {
        let needle = format!("${k}");
        if out.contains(&needle) {
            out = out.replace(&needle, &v);
        }
    }
    out
}
