//! Backend base URL resolution.
//!
//! The base URL comes from the build-time `PORTAL_API_URL` variable and can
//! be overridden at runtime through the `apiBaseUrl` localStorage entry.
//! Relative values resolve against the page origin.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use url::Url;

/// Build-time environment variable naming the backend base URL.
pub const API_URL_ENV: &str = "PORTAL_API_URL";
/// localStorage key holding a runtime override of the base URL.
pub const API_URL_OVERRIDE_KEY: &str = "apiBaseUrl";
/// Ceiling applied to every backend call.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 100_000;

const BUILD_TIME_API_URL: Option<&str> = option_env!("PORTAL_API_URL");

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("page origin is not a valid url: {0}")]
    InvalidOrigin(String),

    #[error("api base url {value:?} is invalid: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

/// Resolved backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    pub timeout_ms: u32,
}

impl ApiConfig {
    /// Wrap an absolute base URL, enforcing a trailing `/` so relative
    /// endpoint paths join beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when `base` does not parse or
    /// cannot serve as a base.
    pub fn new(base: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base).map_err(|e| invalid(base, &e.to_string()))?;
        Self::from_url(url)
    }

    fn from_url(mut url: Url) -> Result<Self, ConfigError> {
        if url.cannot_be_a_base() {
            return Err(invalid(url.as_str(), "cannot be a base"));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { base_url: url, timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS })
    }

    /// Pick the effective base URL.
    ///
    /// Precedence: non-blank runtime override, then non-blank build-time
    /// value, then the page origin itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin or the chosen value is not a usable URL.
    pub fn resolve(build_time: Option<&str>, runtime_override: Option<&str>, origin: &str) -> Result<Self, ConfigError> {
        let origin_url = Url::parse(origin).map_err(|_| ConfigError::InvalidOrigin(origin.to_owned()))?;
        let chosen = [runtime_override, build_time]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|v| !v.is_empty());
        let Some(value) = chosen else {
            return Self::from_url(origin_url);
        };
        let url = origin_url.join(value).map_err(|e| invalid(value, &e.to_string()))?;
        Self::from_url(url)
    }

    /// Resolve from the compiled-in value, the localStorage override, and
    /// `window.location.origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved value is not a usable URL.
    pub fn from_browser() -> Result<Self, ConfigError> {
        let runtime_override = crate::util::storage::load_string(API_URL_OVERRIDE_KEY);
        let origin = page_origin();
        Self::resolve(BUILD_TIME_API_URL, runtime_override.as_deref(), &origin)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join a relative endpoint path (e.g. `api/auth/login`) onto the base.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        self.base_url.join(path).map_err(|e| invalid(path, &e.to_string()))
    }
}

fn invalid(value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidBaseUrl { value: value.to_owned(), reason: reason.to_owned() }
}

fn page_origin() -> String {
    #[cfg(feature = "csr")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_else(|| "http://localhost/".to_owned())
    }
    #[cfg(not(feature = "csr"))]
    {
        "http://localhost/".to_owned()
    }
}
