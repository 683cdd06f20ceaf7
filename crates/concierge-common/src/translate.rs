//! Sequential page translation.
//!
//! A page is translated into every configured language one call at a time.
//! Calls are paced with a fixed pause so the hosted translator is never hit
//! concurrently by one orchestrator, and a failed language falls back to the
//! source text instead of aborting the run.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::lang::Language;
use crate::notify::{Notice, Notifier};

/// Title and body of one page in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedPage {
    pub title: String,
    pub content: String,
}

impl TranslatedPage {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// How an entry got its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    /// The source language; copied from the input.
    Source,
    /// Returned by the translator.
    Translated,
    /// The translator failed; the entry holds the source text.
    Fallback { reason: String },
}

/// One language's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub language: Language,
    #[serde(flatten)]
    pub page: TranslatedPage,
    #[serde(flatten)]
    pub status: EntryStatus,
}

impl TranslationEntry {
    pub fn is_fallback(&self) -> bool {
        matches!(self.status, EntryStatus::Fallback { .. })
    }
}

/// Result of a run: one entry per requested language, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationSet {
    entries: Vec<TranslationEntry>,
}

impl TranslationSet {
    pub fn get(&self, language: &Language) -> Option<&TranslationEntry> {
        self.entries.iter().find(|e| &e.language == language)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.iter()
    }

    /// Languages whose entry is a fallback copy of the source.
    pub fn fallbacks(&self) -> impl Iterator<Item = &Language> {
        self.entries
            .iter()
            .filter(|e| e.is_fallback())
            .map(|e| &e.language)
    }

    pub fn into_entries(self) -> Vec<TranslationEntry> {
        self.entries
    }
}

/// External translation backend.
///
/// Use `Translator` (the `Send` variant) for anything driven by a
/// multi-threaded runtime.
#[trait_variant::make(Translator: Send)]
pub trait LocalTranslator {
    /// Translate a page's title and content into `language`.
    async fn translate_page(
        &self,
        language: &Language,
        page: &TranslatedPage,
    ) -> Result<TranslatedPage, TranslateError>;
}

/// Drives a page through a translator for a list of languages, strictly one
/// call at a time.
pub struct SequentialTranslator<T, N> {
    translator: T,
    notifier: N,
    delay: Duration,
    // Held for a whole run so overlapping runs queue instead of interleaving.
    in_flight: Mutex<()>,
}

impl<T, N> SequentialTranslator<T, N>
where
    T: Translator,
    N: Notifier,
{
    pub fn new(translator: T, notifier: N) -> Self {
        Self {
            translator,
            notifier,
            delay: Duration::from_millis(TranslationConfig::DEFAULT_DELAY_MS),
            in_flight: Mutex::new(()),
        }
    }

    pub fn from_config(translator: T, notifier: N, config: &TranslationConfig) -> Self {
        Self::new(translator, notifier).with_delay(config.delay())
    }

    /// Set the pause between consecutive translator calls.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Translate `page` (written in `source`) into each of `languages`.
    ///
    /// Always returns one entry per distinct language in `languages`. The
    /// source language, if listed, is copied without a call. Repeated codes
    /// are only processed the first time they appear.
    #[tracing::instrument(skip_all, fields(source = %source, languages = languages.len()))]
    pub async fn translate_page(
        &self,
        source: &Language,
        languages: &[Language],
        page: &TranslatedPage,
    ) -> TranslationSet {
        let _guard = self.in_flight.lock().await;

        let mut set = TranslationSet {
            entries: Vec::with_capacity(languages.len()),
        };
        let mut calls = 0usize;

        for language in languages {
            if set.get(language).is_some() {
                debug!(language = %language, "skipping repeated language");
                continue;
            }

            if language == source {
                set.entries.push(TranslationEntry {
                    language: language.clone(),
                    page: page.clone(),
                    status: EntryStatus::Source,
                });
                continue;
            }

            if calls > 0 {
                tokio::time::sleep(self.delay).await;
            }
            calls += 1;

            debug!(language = %language, "requesting translation");
            let entry = match Translator::translate_page(&self.translator, language, page).await {
                Ok(translated) => {
                    info!(language = %language, "page translated");
                    self.notifier
                        .notify(Notice::success(format!("Translated to {language}")));
                    TranslationEntry {
                        language: language.clone(),
                        page: translated,
                        status: EntryStatus::Translated,
                    }
                }
                Err(e) => {
                    warn!(language = %language, error = %e, "translation failed, keeping source text");
                    self.notifier.notify(Notice::error(format!(
                        "Translation to {language} failed; the original text was kept"
                    )));
                    TranslationEntry {
                        language: language.clone(),
                        page: page.clone(),
                        status: EntryStatus::Fallback {
                            reason: e.to_string(),
                        },
                    }
                }
            };
            set.entries.push(entry);
        }

        info!(
            calls,
            fallbacks = set.fallbacks().count(),
            "translation run complete"
        );
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;
    use std::collections::HashSet;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    const LATENCY: Duration = Duration::from_millis(100);

    #[derive(Default)]
    struct FakeTranslator {
        failing: HashSet<&'static str>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: StdMutex<Vec<(Language, Instant, Instant)>>,
    }

    impl FakeTranslator {
        fn failing(codes: &[&'static str]) -> Self {
            Self {
                failing: codes.iter().copied().collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(Language, Instant, Instant)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Translator for FakeTranslator {
        async fn translate_page(
            &self,
            language: &Language,
            page: &TranslatedPage,
        ) -> Result<TranslatedPage, TranslateError> {
            let started = Instant::now();
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(LATENCY).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls
                .lock()
                .unwrap()
                .push((language.clone(), started, Instant::now()));

            if self.failing.contains(language.as_str()) {
                return Err(TranslateError::Backend("quota exceeded".into()));
            }
            Ok(TranslatedPage::new(
                format!("[{language}] {}", page.title),
                format!("[{language}] {}", page.content),
            ))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(StdMutex<Vec<Notice>>);

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.0.lock().unwrap().push(notice);
        }
    }

    fn langs(codes: &[&str]) -> Vec<Language> {
        codes.iter().map(|c| Language::new(c).unwrap()).collect()
    }

    fn page() -> TranslatedPage {
        TranslatedPage::new("Wi-Fi", "Network: Hotel-Guest")
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_language_falls_back_to_source() {
        let notifier = RecordingNotifier::default();
        let orchestrator = SequentialTranslator::new(FakeTranslator::failing(&["fr"]), &notifier);

        let source = Language::new("es").unwrap();
        let set = orchestrator
            .translate_page(&source, &langs(&["en", "fr", "de"]), &page())
            .await;

        assert_eq!(set.len(), 3);
        let codes: Vec<_> = set.iter().map(|e| e.language.as_str()).collect();
        assert_eq!(codes, vec!["en", "fr", "de"]);

        let fr = set.get(&Language::new("fr").unwrap()).unwrap();
        assert_eq!(fr.page, page());
        assert!(fr.is_fallback());

        let en = set.get(&Language::new("en").unwrap()).unwrap();
        assert_eq!(en.page.title, "[en] Wi-Fi");
        assert_eq!(en.status, EntryStatus::Translated);
        let de = set.get(&Language::new("de").unwrap()).unwrap();
        assert_eq!(de.page.content, "[de] Network: Hotel-Guest");

        let notices = notifier.0.lock().unwrap();
        let levels: Vec<_> = notices.iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![NoticeLevel::Success, NoticeLevel::Error, NoticeLevel::Success]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_language_is_copied_without_a_call() {
        let orchestrator = SequentialTranslator::new(FakeTranslator::default(), ());
        let source = Language::new("es").unwrap();

        let set = orchestrator
            .translate_page(&source, &langs(&["es", "en"]), &page())
            .await;

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(&source).unwrap().status, EntryStatus::Source);
        assert_eq!(set.get(&source).unwrap().page, page());
        let calls = orchestrator.translator().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.as_str(), "en");
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_are_paced_and_never_overlap() {
        let orchestrator = SequentialTranslator::new(FakeTranslator::failing(&["it"]), ());
        let source = Language::new("es").unwrap();
        let targets = langs(&["es", "en", "fr", "de", "it"]);

        let start = Instant::now();
        orchestrator.translate_page(&source, &targets, &page()).await;
        let elapsed = start.elapsed();

        let calls = orchestrator.translator().calls();
        assert_eq!(calls.len(), 4);
        for pair in calls.windows(2) {
            let (_, _, prev_end) = pair[0];
            let (_, next_start, _) = pair[1];
            assert!(next_start >= prev_end + orchestrator.delay());
        }
        assert_eq!(
            orchestrator.translator().max_in_flight.load(Ordering::SeqCst),
            1
        );

        // 4 calls => 3 pauses, even though the last call fails.
        let expected = orchestrator.delay() * 3 + LATENCY * 4;
        assert!(elapsed >= expected);
        assert!(elapsed < expected + orchestrator.delay());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_runs_are_serialized() {
        let orchestrator =
            SequentialTranslator::new(FakeTranslator::default(), ()).with_delay(Duration::from_millis(50));
        let source = Language::new("es").unwrap();
        let first = langs(&["en", "fr"]);
        let second = langs(&["de", "it"]);
        let p = page();

        let (a, b) = tokio::join!(
            orchestrator.translate_page(&source, &first, &p),
            orchestrator.translate_page(&source, &second, &p),
        );

        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
        assert_eq!(
            orchestrator.translator().max_in_flight.load(Ordering::SeqCst),
            1
        );
        assert_eq!(orchestrator.translator().calls().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_language_gets_one_entry() {
        let orchestrator = SequentialTranslator::new(FakeTranslator::default(), ());
        let source = Language::new("es").unwrap();

        let set = orchestrator
            .translate_page(&source, &langs(&["en", "EN", "fr"]), &page())
            .await;

        assert_eq!(set.len(), 2);
        assert_eq!(orchestrator.translator().calls().len(), 2);
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = TranslationEntry {
            language: Language::new("fr").unwrap(),
            page: page(),
            status: EntryStatus::Fallback {
                reason: "timeout".into(),
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["language"], "fr");
        assert_eq!(json["title"], "Wi-Fi");
        assert_eq!(json["status"], "fallback");
        assert_eq!(json["reason"], "timeout");
    }
}
