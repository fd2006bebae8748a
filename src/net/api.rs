//! REST gateway for the auth backend.
//!
//! Every call builds an [`ApiRequest`] against the configured base URL and
//! attaches the bearer token read from the session slot at that moment, so a
//! rotated token applies to the very next request.
//!
//! ERROR HANDLING
//! ==============
//! Operations return `Result<_, ApiError>`. Statuses with domain meaning
//! (reset-link `204`, reset-password `200`/`601`/`498`) are matched
//! explicitly rather than folded into a generic "ok".

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use url::Url;

use super::transport::{ApiRequest, ApiResponse, BrowserTransport, HttpTransport, Method};
use super::types::{
    AccountDetails, ApiError, BookDemoRequest, LoginRequest, ReissuedTokenBody, ResetPasswordOutcome,
    ResetPasswordRequest, Role, SessionRecord,
};
use crate::config::ApiConfig;
use crate::state::session::SharedSessionStore;

pub const LOGIN_PATH: &str = "api/auth/login";
pub const RESET_PASSWORD_PATH: &str = "api/auth/ResetPassword";
pub const RESET_LINK_PATH: &str = "api/auth/GetResetPasswordUrl";
pub const BOOK_DEMO_PATH: &str = "api/auth/bookDemo";
pub const DEFAULT_PASSWORD_PATH: &str = "api/auth/ResetToDefaultPassword";
pub const ACCOUNT_DETAILS_PATH: &str = "api/auth/accountDetails";
pub const ROLES_PATH: &str = "api/auth/Roles";

/// Status the backend uses to confirm a reset email was queued.
pub const STATUS_RESET_LINK_SENT: u16 = 204;
/// Status for "password reused; resubmit with the token in the body".
pub const STATUS_PASSWORD_REUSED: u16 = 601;
/// Status for "reset token expired".
pub const STATUS_TOKEN_EXPIRED: u16 = 498;

/// Gateway over a pluggable transport.
#[derive(Clone)]
pub struct AuthGateway<T> {
    config: ApiConfig,
    session: SharedSessionStore,
    transport: T,
}

/// The gateway used by the browser build.
pub type BrowserGateway = AuthGateway<BrowserTransport>;

impl BrowserGateway {
    pub fn for_browser(config: ApiConfig, session: SharedSessionStore) -> Self {
        let transport = BrowserTransport::new(config.timeout_ms);
        Self::new(config, session, transport)
    }
}

impl<T: HttpTransport> AuthGateway<T> {
    pub fn new(config: ApiConfig, session: SharedSessionStore, transport: T) -> Self {
        Self { config, session, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `POST api/auth/login`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] for any non-2xx answer (rejections included),
    /// transport or decode failures otherwise.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionRecord, ApiError> {
        let url = self.url(LOGIN_PATH)?;
        let body = to_body(&LoginRequest { username, password })?;
        let resp = self.send(Method::Post, url, Some(body)).await?;
        expect_success(&resp)?;
        resp.json()
    }

    /// `POST api/auth/GetResetPasswordUrl?username=`. Only `204` counts as
    /// "email sent".
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] for every other status, including `200`.
    pub async fn request_reset_link(&self, username: &str) -> Result<(), ApiError> {
        let mut url = self.url(RESET_LINK_PATH)?;
        url.query_pairs_mut().append_pair("username", username);
        let resp = self.send(Method::Post, url, Some(serde_json::json!({}))).await?;
        if resp.status == STATUS_RESET_LINK_SENT {
            Ok(())
        } else {
            Err(status_error(resp))
        }
    }

    /// `POST api/auth/ResetPassword`, classified by status.
    ///
    /// # Errors
    ///
    /// Only transport failures and an undecodable `200` body are errors;
    /// every status maps to a [`ResetPasswordOutcome`].
    pub async fn reset_password(
        &self,
        token: &str,
        username: &str,
        password: &str,
    ) -> Result<ResetPasswordOutcome, ApiError> {
        let url = self.url(RESET_PASSWORD_PATH)?;
        let body = to_body(&ResetPasswordRequest { token, username, password })?;
        let resp = self.send(Method::Post, url, Some(body)).await?;
        classify_reset_response(&resp)
    }

    /// `POST api/auth/bookDemo`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] for non-2xx answers.
    pub async fn book_demo(&self, email: &str, fullname: &str) -> Result<(), ApiError> {
        let url = self.url(BOOK_DEMO_PATH)?;
        let body = to_body(&BookDemoRequest { email, fullname })?;
        let resp = self.send(Method::Post, url, Some(body)).await?;
        expect_success(&resp)
    }

    /// `POST api/auth/ResetToDefaultPassword/{username}`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] for non-2xx answers.
    pub async fn reset_to_default_password(&self, username: &str) -> Result<(), ApiError> {
        let url = self.url_with_segment(DEFAULT_PASSWORD_PATH, username)?;
        let resp = self.send(Method::Post, url, Some(serde_json::json!({}))).await?;
        expect_success(&resp)
    }

    /// `GET api/auth/accountDetails/{userId}`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] for non-2xx answers, decode failures otherwise.
    pub async fn account_details(&self, user_id: &str) -> Result<AccountDetails, ApiError> {
        let url = self.url_with_segment(ACCOUNT_DETAILS_PATH, user_id)?;
        let resp = self.send(Method::Get, url, None).await?;
        expect_success(&resp)?;
        resp.json()
    }

    /// `GET api/auth/Roles`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] for non-2xx answers, decode failures otherwise.
    pub async fn roles(&self) -> Result<Vec<Role>, ApiError> {
        let url = self.url(ROLES_PATH)?;
        let resp = self.send(Method::Get, url, None).await?;
        expect_success(&resp)?;
        resp.json()
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.config.endpoint(path).map_err(|e| ApiError::Url(e.to_string()))
    }

    /// Join `path` and append `segment` as one percent-encoded path segment.
    fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, ApiError> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(path.to_owned()))?
            .push(segment);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<serde_json::Value>) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest { method, url: url.to_string(), bearer: self.session.token(), body };
        log::debug!("{method:?} {}", url.path());
        let resp = self.transport.send(request).await;
        match &resp {
            Ok(r) => log::debug!("{} -> {}", url.path(), r.status),
            Err(e) => log::warn!("{} failed: {e}", url.path()),
        }
        resp
    }
}

/// Map a reset-password response onto its outcome.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when a `200` body is not a session record.
pub fn classify_reset_response(resp: &ApiResponse) -> Result<ResetPasswordOutcome, ApiError> {
    match resp.status {
        200 => resp.json().map(ResetPasswordOutcome::Success),
        STATUS_PASSWORD_REUSED => {
            let body: ReissuedTokenBody = serde_json::from_str(&resp.body).unwrap_or_default();
            Ok(ResetPasswordOutcome::PasswordReused { new_token: body.token.filter(|t| !t.is_empty()) })
        }
        STATUS_TOKEN_EXPIRED => Ok(ResetPasswordOutcome::TokenExpired),
        status => Ok(ResetPasswordOutcome::Failed { status }),
    }
}

fn expect_success(resp: &ApiResponse) -> Result<(), ApiError> {
    if resp.is_success() { Ok(()) } else { Err(status_error(resp.clone())) }
}

fn status_error(resp: ApiResponse) -> ApiError {
    ApiError::Status { status: resp.status, body: resp.body }
}

fn to_body<B: serde::Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}
