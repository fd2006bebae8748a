//! Auth flows: gateway calls plus the state transitions they drive.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call these instead of touching the gateway and store separately,
//! so every authentication-relevant response lands in `AuthStore` (and so in
//! the session slot) the same way. Each flow takes a ticket before its first
//! await and drops its result if the ticket has been superseded.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use time::OffsetDateTime;

use crate::net::api::AuthGateway;
use crate::net::transport::HttpTransport;
use crate::net::types::{AccountDetails, ApiError, ResetPasswordOutcome, Role};
use crate::state::auth::AuthHandle;
use crate::util::i18n::{Locale, Msg, t};

/// How a login attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn,
    /// Backend refused the credentials; the store holds the generic message.
    Rejected,
    /// No response; the caller should raise a transient notice.
    NetworkError,
    Failed,
    /// A newer operation (or logout) happened first; nothing was applied.
    Superseded,
}

/// Sign in and record the outcome in the store.
pub async fn login<T, H>(gateway: &AuthGateway<T>, auth: &H, locale: Locale, username: &str, password: &str) -> LoginOutcome
where
    T: HttpTransport,
    H: AuthHandle,
{
    let Some(ticket) = auth.with_store(|s| s.start()) else {
        return LoginOutcome::Superseded;
    };
    log::info!("login attempt for {username}");
    let result = gateway.login(username, password).await;

    let (outcome, message) = match result {
        Ok(record) => {
            let applied = auth.with_store(|s| {
                if !s.is_current(ticket) {
                    return false;
                }
                s.success(record);
                true
            });
            return if applied == Some(true) {
                log::info!("signed in as {username}");
                LoginOutcome::SignedIn
            } else {
                LoginOutcome::Superseded
            };
        }
        Err(e) if e.is_rejection() => (LoginOutcome::Rejected, t(locale, Msg::IncorrectCredentials)),
        Err(e) if e.is_transport() => (LoginOutcome::NetworkError, t(locale, Msg::NetworkError)),
        Err(e) => {
            log::warn!("login failed: {e}");
            (LoginOutcome::Failed, t(locale, Msg::GeneralError))
        }
    };

    let applied = auth.with_store(|s| {
        if !s.is_current(ticket) {
            return false;
        }
        s.failure(message);
        true
    });
    if applied == Some(true) { outcome } else { LoginOutcome::Superseded }
}

/// How a reset-link request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetLinkOutcome {
    Sent,
    UnknownUser,
    NetworkError,
}

/// Ask the backend to email a reset link. Touches no auth state.
pub async fn request_reset_link<T: HttpTransport>(gateway: &AuthGateway<T>, username: &str) -> ResetLinkOutcome {
    match gateway.request_reset_link(username).await {
        Ok(()) => ResetLinkOutcome::Sent,
        Err(e) if e.is_transport() => ResetLinkOutcome::NetworkError,
        Err(e) => {
            log::info!("reset link refused: {e}");
            ResetLinkOutcome::UnknownUser
        }
    }
}

/// How a reset-password submission ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetFlowOutcome {
    /// Password changed and the new session was adopted.
    Completed,
    /// Password reused; resubmit with `new_token` when present.
    PasswordReused { new_token: Option<String> },
    /// Reset token expired; the user must request a new link.
    TokenExpired,
    Failed,
    NetworkError,
    Superseded,
}

/// Submit a new password. Only a `200` changes auth state.
pub async fn reset_password<T, H>(gateway: &AuthGateway<T>, auth: &H, token: &str, username: &str, password: &str) -> ResetFlowOutcome
where
    T: HttpTransport,
    H: AuthHandle,
{
    let Some(ticket) = auth.with_store(|s| s.issue_ticket()) else {
        return ResetFlowOutcome::Superseded;
    };
    match gateway.reset_password(token, username, password).await {
        Ok(ResetPasswordOutcome::Success(record)) => {
            let applied = auth.with_store(|s| {
                if !s.is_current(ticket) {
                    return false;
                }
                s.success(record);
                true
            });
            if applied == Some(true) { ResetFlowOutcome::Completed } else { ResetFlowOutcome::Superseded }
        }
        Ok(ResetPasswordOutcome::PasswordReused { new_token }) => ResetFlowOutcome::PasswordReused { new_token },
        Ok(ResetPasswordOutcome::TokenExpired) => ResetFlowOutcome::TokenExpired,
        Ok(ResetPasswordOutcome::Failed { status }) => {
            log::warn!("reset password failed with status {status}");
            ResetFlowOutcome::Failed
        }
        Err(e) if e.is_transport() => ResetFlowOutcome::NetworkError,
        Err(e) => {
            log::warn!("reset password failed: {e}");
            ResetFlowOutcome::Failed
        }
    }
}

/// Drop the session.
pub fn logout<H: AuthHandle>(auth: &H) {
    log::info!("logout");
    auth.with_store(|s| s.logout());
}

/// Rebuild auth state from the session slot at startup.
pub fn restore_session<H: AuthHandle>(auth: &H, now: OffsetDateTime) -> bool {
    auth.with_store(|s| s.hydrate(now)).unwrap_or(false)
}

/// Account details and the role catalog for the signed-in user.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountOverview {
    pub details: AccountDetails,
    pub roles: Vec<Role>,
}

/// Fetch the account overview shown on the home page.
///
/// # Errors
///
/// Returns the first gateway error encountered.
pub async fn load_account_overview<T: HttpTransport>(gateway: &AuthGateway<T>, user_id: &str) -> Result<AccountOverview, ApiError> {
    let details = gateway.account_details(user_id).await?;
    let roles = gateway.roles().await?;
    Ok(AccountOverview { details, roles })
}

/// Request a product demo for `email`. Touches no auth state.
///
/// # Errors
///
/// Returns the gateway error unchanged.
pub async fn book_demo<T: HttpTransport>(gateway: &AuthGateway<T>, email: &str, fullname: &str) -> Result<(), ApiError> {
    gateway.book_demo(email, fullname).await.inspect_err(|e| log::warn!("book demo failed: {e}"))
}

/// Reset `username` to the backend's default password. Operator action;
/// the caller's own session is not affected.
///
/// # Errors
///
/// Returns the gateway error unchanged.
pub async fn reset_to_default_password<T: HttpTransport>(gateway: &AuthGateway<T>, username: &str) -> Result<(), ApiError> {
    gateway
        .reset_to_default_password(username)
        .await
        .inspect(|_| log::info!("password reset to default for {username}"))
        .inspect_err(|e| log::warn!("default password reset failed: {e}"))
}
