//! User-facing notifications (toasts in the admin panel).
//!
//! The core never renders anything; it hands short notices to a `Notifier`
//! supplied by the host application.

use smol_str::SmolStr;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: SmolStr,
}

impl Notice {
    pub fn success(message: impl Into<SmolStr>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<SmolStr>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<SmolStr>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives user-facing notices.
///
/// Takes `&self` so one notifier can be shared between an editor session and
/// a running translation.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Unit type implementation - notices are dropped.
impl Notifier for () {
    fn notify(&self, _notice: Notice) {}
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Notifier that writes every notice to the tracing log.
///
/// Used by the CLI, where there is no toast surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!(message = %notice.message, "notice")
            }
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "notice"),
        }
    }
}
