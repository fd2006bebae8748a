//! Light/dark theme preference.
//!
//! Reads the stored `themeMode` preference (default light) and applies it as
//! a `data-theme` attribute on the `<html>` element. Toggling writes the new
//! mode back. Requires a browser environment.
//!
//! TRADE-OFFS
//! ==========
//! Preference persistence is best-effort browser-only behavior; native
//! builds no-op so the toggle logic stays testable.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use crate::util::storage;

pub const STORAGE_KEY: &str = "themeMode";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value; anything unrecognised is light.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Read the stored preference.
pub fn read_preference() -> ThemeMode {
    ThemeMode::parse(storage::load_string(STORAGE_KEY).as_deref())
}

/// Apply the `data-theme` attribute on the `<html>` element.
pub fn apply(mode: ThemeMode) {
    #[cfg(feature = "csr")]
    {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.document_element())
        {
            let _ = el.set_attribute("data-theme", mode.as_str());
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = mode;
    }
}

/// Apply and persist `mode`.
pub fn set(mode: ThemeMode) -> ThemeMode {
    apply(mode);
    storage::save_string(STORAGE_KEY, mode.as_str());
    mode
}

/// Flip the theme and persist the new preference.
pub fn toggle(current: ThemeMode) -> ThemeMode {
    set(current.toggled())
}
