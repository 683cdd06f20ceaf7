//! concierge-common: configuration, errors, logging and the translation
//! pipeline shared by the concierge crates.

#[cfg(feature = "http")]
pub mod client;
pub mod config;
pub mod error;
pub mod icons;
pub mod lang;
pub mod notify;
pub mod telemetry;
pub mod translate;

#[cfg(feature = "http")]
pub use crate::client::HttpTranslator;
pub use crate::config::Config;
pub use crate::error::{ConciergeError, ConfigError, TranslateError};
pub use crate::icons::IconMap;
pub use crate::lang::Language;
pub use crate::notify::{LogNotifier, Notice, NoticeLevel, Notifier};
pub use crate::translate::{
    EntryStatus, LocalTranslator, SequentialTranslator, TranslatedPage, TranslationEntry,
    TranslationSet, Translator,
};
