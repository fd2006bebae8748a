//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthStore` is the single in-memory owner of the signed-in user. It lives
//! in an `RwSignal` provided through Leptos context and mirrors the durable
//! session slot: every transition touching the user writes through to the
//! [`SessionStore`] in the same call. Views never mutate the state directly.
//!
//! Async operations hold a [`RequestTicket`]; a response is applied only if
//! its ticket is still current, so a superseded login cannot overwrite a
//! newer outcome or resurrect a session after logout.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use time::OffsetDateTime;

use crate::net::types::{SessionRecord, User};
use crate::state::session::{SessionStore, SharedSessionStore};

/// Observable authentication state.
///
/// `is_authenticated` always equals `user.is_some()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// Marks one in-flight operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Owner of [`AuthState`] plus its write-through session slot.
#[derive(Clone)]
pub struct AuthStore {
    state: AuthState,
    expires_in: Option<OffsetDateTime>,
    generation: u64,
    session: SharedSessionStore,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("state", &self.state)
            .field("expires_in", &self.expires_in)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl AuthStore {
    pub fn new(session: SharedSessionStore) -> Self {
        Self { state: AuthState::default(), expires_in: None, generation: 0, session }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    pub fn shared_session(&self) -> SharedSessionStore {
        Arc::clone(&self.session)
    }

    /// The durable record as it stands right now.
    pub fn session_record(&self) -> Option<SessionRecord> {
        self.session.get()
    }

    /// Signed in here and the durable record is still usable at `now`.
    pub fn has_usable_session(&self, now: OffsetDateTime) -> bool {
        self.state.is_authenticated && self.session.get().is_some_and(|r| r.is_usable(now))
    }

    // =========================================================================
    // TICKETS
    // =========================================================================

    /// Take a ticket without touching visible state.
    pub fn issue_ticket(&mut self) -> RequestTicket {
        self.generation += 1;
        RequestTicket(self.generation)
    }

    /// True when no newer operation (or logout) has happened since `ticket`.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.generation
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Enter loading and clear any previous error.
    pub fn start(&mut self) -> RequestTicket {
        self.state.loading = true;
        self.state.error = None;
        self.issue_ticket()
    }

    /// Adopt `record` as the signed-in session and persist it.
    pub fn success(&mut self, record: SessionRecord) {
        self.session.set(&record);
        self.expires_in = record.expires_in;
        self.state.user = Some(record.user);
        self.state.is_authenticated = true;
        self.state.loading = false;
        self.state.error = None;
    }

    pub fn failure(&mut self, message: impl Into<String>) {
        self.state.loading = false;
        self.state.error = Some(message.into());
    }

    /// Replace the cached user without writing to the session slot. Used to
    /// hydrate from a record that already lives there.
    pub fn set(&mut self, record: Option<SessionRecord>) {
        match record {
            Some(record) => {
                self.expires_in = record.expires_in;
                self.state.user = Some(record.user);
            }
            None => {
                self.expires_in = None;
                self.state.user = None;
            }
        }
        self.state.is_authenticated = self.state.user.is_some();
        self.state.error = None;
    }

    /// Rotate the bearer token and re-persist the full record. Ignored when
    /// nobody is signed in.
    pub fn update_token(&mut self, token: impl Into<String>) -> bool {
        let Some(user) = self.state.user.as_mut() else {
            return false;
        };
        user.token = Some(token.into());
        let record = SessionRecord::new(user.clone(), self.expires_in);
        self.session.set(&record);
        true
    }

    /// Drop the user, clear the session slot, and invalidate in-flight
    /// operations. Idempotent.
    pub fn logout(&mut self) {
        self.session.clear();
        self.expires_in = None;
        self.state.user = None;
        self.state.is_authenticated = false;
        self.state.loading = false;
        self.state.error = None;
        self.generation += 1;
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Rebuild the cache from the session slot at startup. Records without a
    /// token or past their expiry are discarded.
    pub fn hydrate(&mut self, now: OffsetDateTime) -> bool {
        match self.session.get() {
            Some(record) if record.is_usable(now) => {
                log::debug!("restored session for {}", record.user.username);
                self.set(Some(record));
                true
            }
            Some(_) => {
                log::info!("discarding stale session record");
                self.session.clear();
                self.set(None);
                false
            }
            None => {
                self.set(None);
                false
            }
        }
    }
}

/// Anything that can run a closure against the shared [`AuthStore`].
///
/// Flows are written against this so they work with the context signal in
/// the browser and with a plain cell in tests. Returns `None` when the
/// store is gone (e.g. the owning view was disposed).
pub trait AuthHandle {
    fn with_store<R>(&self, f: impl FnOnce(&mut AuthStore) -> R) -> Option<R>;
}

impl AuthHandle for leptos::prelude::RwSignal<AuthStore> {
    fn with_store<R>(&self, f: impl FnOnce(&mut AuthStore) -> R) -> Option<R> {
        use leptos::prelude::Update;
        self.try_update(f)
    }
}

impl AuthHandle for std::cell::RefCell<AuthStore> {
    fn with_store<R>(&self, f: impl FnOnce(&mut AuthStore) -> R) -> Option<R> {
        let mut store = self.try_borrow_mut().ok()?;
        Some(f(&mut store))
    }
}

/// Current wall-clock instant.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}
