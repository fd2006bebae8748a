//! Route-guard decisions and login redirect helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected views consult [`evaluate_guard`] on every navigation and every
//! auth change. This is a UX gate only: the token is just a capability the
//! backend re-validates, so nothing here protects data by itself.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use time::OffsetDateTime;
use url::form_urlencoded;

use crate::net::types::SessionRecord;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
/// Query parameter carrying the post-login return target.
pub const REDIRECT_PARAM: &str = "redirect";

/// Outcome of a guard check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// No usable session: send to login, come back to `return_to`.
    Unauthenticated { return_to: String },
    /// Signed in without any required role: clear the session, then send to
    /// login.
    Forbidden { return_to: String },
}

impl GuardDecision {
    /// Login URL for denials; `None` when access is allowed.
    pub fn redirect_url(&self) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::Unauthenticated { return_to } | Self::Forbidden { return_to } => Some(login_redirect(return_to)),
        }
    }
}

/// Decide whether `session` may see a view.
///
/// `required_roles` empty means "any signed-in user". The return target is
/// `fallback` when given, else `requested` (path plus query).
pub fn evaluate_guard(
    session: Option<&SessionRecord>,
    required_roles: &[&str],
    requested: &str,
    fallback: Option<&str>,
    now: OffsetDateTime,
) -> GuardDecision {
    let return_to = fallback.unwrap_or(requested).to_owned();
    let Some(record) = session.filter(|r| r.is_usable(now)) else {
        return GuardDecision::Unauthenticated { return_to };
    };
    if !required_roles.is_empty() && !record.user.has_any_role(required_roles) {
        return GuardDecision::Forbidden { return_to };
    }
    GuardDecision::Allow
}

/// `/login?redirect=<encoded target>`.
pub fn login_redirect(return_to: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair(REDIRECT_PARAM, return_to)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

/// Read the `redirect` parameter from a query string (with or without the
/// leading `?`) and keep it only if it is a same-origin path.
pub fn redirect_target(search: &str) -> String {
    let query = search.strip_prefix('?').unwrap_or(search);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == REDIRECT_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| is_safe_return_path(value))
        .unwrap_or_else(|| HOME_PATH.to_owned())
}

/// Only absolute in-app paths are accepted: `/x` yes, `//host`, `/\host`,
/// and full URLs no.
pub fn is_safe_return_path(value: &str) -> bool {
    value.starts_with('/') && !value.starts_with("//") && !value.contains('\\')
}

/// Look up a single query parameter.
pub fn query_param(search: &str, name: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Join a pathname and a query string (with or without the leading `?`)
/// into the target the guard preserves.
pub fn requested_path(pathname: &str, search: &str) -> String {
    let query = search.strip_prefix('?').unwrap_or(search);
    if query.is_empty() { pathname.to_owned() } else { format!("{pathname}?{query}") }
}
