//! Local UI chrome state (theme, language, transient notice).
//!
//! DESIGN
//! ======
//! Keeps presentation concerns out of `AuthStore` so the theme toggle and
//! language select can change without touching session data.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use crate::util::i18n::Locale;
use crate::util::theme::ThemeMode;

/// Severity of a transient notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short-lived banner message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub text: String,
    /// Distinguishes repeated identical notices so each gets its own timer.
    pub seq: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub theme: ThemeMode,
    pub locale: Locale,
    pub notice: Option<Notice>,
    notice_seq: u64,
}

impl UiState {
    pub fn new(theme: ThemeMode, locale: Locale) -> Self {
        Self { theme, locale, ..Self::default() }
    }

    /// Show a notice, replacing any current one. Returns its sequence number.
    pub fn notify(&mut self, kind: NoticeKind, title: impl Into<String>, text: impl Into<String>) -> u64 {
        self.notice_seq += 1;
        self.notice = Some(Notice { kind, title: title.into(), text: text.into(), seq: self.notice_seq });
        self.notice_seq
    }

    /// Dismiss the notice if it is still the one numbered `seq`.
    pub fn dismiss(&mut self, seq: u64) {
        if self.notice.as_ref().is_some_and(|n| n.seq == seq) {
            self.notice = None;
        }
    }
}
