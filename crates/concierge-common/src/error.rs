//! Error types shared across the concierge crates.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for concierge operations
#[derive(Debug, Error, Diagnostic)]
pub enum ConciergeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    #[diagnostic(code(concierge::io))]
    Io(#[from] std::io::Error),
}

/// Configuration loading errors
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    #[diagnostic(code(config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file {}", path.display())]
    #[diagnostic(code(config::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", path.display())]
    #[diagnostic(code(config::parse))]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize config: {0}")]
    #[diagnostic(code(config::serialize))]
    Serialize(String),

    #[error("unsupported config format for {}", path.display())]
    #[diagnostic(
        code(config::format),
        help("use a .toml or .json file extension")
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("missing environment variable {var}")]
    #[diagnostic(code(config::env))]
    MissingEnv { var: &'static str },

    #[error("invalid language code {code:?}")]
    #[diagnostic(code(config::language))]
    InvalidLanguage { code: String },
}

/// Errors from a single translation call.
///
/// These never escape the sequential orchestrator; they are turned into
/// fallback entries there. Direct callers of a `Translator` see them as-is.
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum TranslateError {
    /// The request never produced a response.
    #[error("translation request failed: {0}")]
    #[diagnostic(code(translate::request))]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("translation backend returned {status}: {body}")]
    #[diagnostic(code(translate::status))]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("could not decode translation response: {0}")]
    #[diagnostic(code(translate::decode))]
    Decode(String),

    /// The backend reported a failure of its own.
    #[error("translation backend error: {0}")]
    #[diagnostic(code(translate::backend))]
    Backend(String),
}

impl From<serde_json::Error> for TranslateError {
    fn from(e: serde_json::Error) -> Self {
        TranslateError::Decode(e.to_string())
    }
}
