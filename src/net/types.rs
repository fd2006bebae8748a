//! Wire DTOs for the auth backend and the persisted session shape.
//!
//! DESIGN
//! ======
//! `SessionRecord` is both the login/reset response body and the value kept
//! in the session store, so the serde layout here is the persisted layout:
//! `{ id, fullname, username, email, roles, token, expiresIn }`.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

/// The signed-in user as the backend describes them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Display name.
    pub fullname: String,
    /// Login name.
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Bearer token presented on every backend call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl User {
    /// True when the user holds at least one of `required`.
    pub fn has_any_role(&self, required: &[&str]) -> bool {
        self.roles.iter().any(|role| required.contains(&role.as_str()))
    }

    /// True when a non-blank bearer token is present.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Durable copy of the authenticated user plus its expiry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(flatten)]
    pub user: User,
    /// Instant after which the session is no longer usable.
    #[serde(
        rename = "expiresIn",
        default,
        deserialize_with = "deserialize_expiry",
        serialize_with = "serialize_expiry",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_in: Option<OffsetDateTime>,
}

impl SessionRecord {
    pub fn new(user: User, expires_in: Option<OffsetDateTime>) -> Self {
        Self { user, expires_in }
    }

    /// True when the record carries an expiry at or before `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_in.is_some_and(|at| at <= now)
    }

    /// A record is usable when it has a token and has not expired.
    pub fn is_usable(&self, now: OffsetDateTime) -> bool {
        self.user.has_token() && !self.is_expired(now)
    }
}

/// Body of `POST api/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST api/auth/ResetPassword`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST api/auth/bookDemo`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookDemoRequest<'a> {
    pub email: &'a str,
    pub fullname: &'a str,
}

/// Body sent alongside a `601` reset response.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ReissuedTokenBody {
    #[serde(default)]
    pub token: Option<String>,
}

/// Result of a reset-password submission, keyed off the response status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetPasswordOutcome {
    /// `200`: password changed, a fresh session was issued.
    Success(SessionRecord),
    /// `601`: the new password was used before; resubmit with `new_token`.
    PasswordReused { new_token: Option<String> },
    /// `498`: the reset token expired; the flow must restart.
    TokenExpired,
    /// Any other status.
    Failed { status: u16 },
}

/// Account details returned by `GET api/auth/accountDetails/{userId}`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AccountDetails {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Any further fields the backend adds.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A named permission group.
///
/// `GET api/auth/Roles` may answer with bare names or `{ id, name }` objects;
/// both forms deserialize here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Role {
    pub id: Option<String>,
    pub name: String,
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(name) => Ok(Self { id: None, name }),
            serde_json::Value::Object(map) => {
                let name = map
                    .get("name")
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| D::Error::custom("role object missing name"))?
                    .to_owned();
                let id = match map.get("id") {
                    Some(serde_json::Value::String(s)) => Some(s.clone()),
                    Some(serde_json::Value::Number(n)) => Some(n.to_string()),
                    _ => None,
                };
                Ok(Self { id, name })
            }
            _ => Err(D::Error::custom("expected role name or object")),
        }
    }
}

/// Errors produced by gateway calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network request failed: {0}")]
    Transport(String),

    /// The request exceeded the network ceiling.
    #[error("request timed out after {0} ms")]
    Timeout(u32),

    /// The backend answered with a status the operation does not accept.
    #[error("unexpected status {status}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// A request URL could not be built.
    #[error("invalid request url: {0}")]
    Url(String),

    /// HTTP is only available in the browser build.
    #[error("not available outside the browser")]
    Unavailable,
}

impl ApiError {
    /// Failures that never reached the backend and warrant a retry notice.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_) | Self::Unavailable)
    }

    /// Statuses the backend uses to reject credentials or unknown users.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { status: 400 | 401 | 403 | 404, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn deserialize_expiry<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_expiry))
}

fn serialize_expiry<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(at) => {
            let formatted = at.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
            serializer.serialize_some(&formatted)
        }
        None => serializer.serialize_none(),
    }
}

/// Parse an expiry instant. Offset-less ISO-8601 values are taken as UTC;
/// anything unparsable means "no expiry".
pub(crate) fn parse_expiry(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(at);
    }
    match PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT) {
        Ok(local) => Some(local.assume_utc()),
        Err(e) => {
            log::warn!("ignoring unparsable session expiry {raw:?}: {e}");
            None
        }
    }
}
