//! Durable session slot.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session record is the only durable auth state. `AuthStore` caches it,
//! the route guard reads it, and the gateway pulls the bearer token from it
//! on every request. Nothing here is a trust boundary: the record is neither
//! encrypted nor signed, and the backend re-validates the token on each call.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, PoisonError};

use crate::net::types::SessionRecord;
use crate::util::storage;

/// localStorage key holding the serialized session record.
pub const SESSION_KEY: &str = "user";

/// A persisted key-value slot for the current session.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<SessionRecord>;
    fn set(&self, record: &SessionRecord);
    fn clear(&self);

    /// Bearer token of the stored session, read at call time.
    fn token(&self) -> Option<String> {
        self.get().and_then(|record| record.user.token).filter(|t| !t.trim().is_empty())
    }
}

/// Session slot backed by browser `localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionStore;

impl SessionStore for BrowserSessionStore {
    fn get(&self) -> Option<SessionRecord> {
        storage::load_json(SESSION_KEY)
    }

    fn set(&self, record: &SessionRecord) {
        storage::save_json(SESSION_KEY, record);
    }

    fn clear(&self) {
        storage::remove(SESSION_KEY);
    }
}

/// In-process session slot. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<SessionRecord>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SessionRecord) -> Self {
        Self { slot: Arc::new(Mutex::new(Some(record))) }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<SessionRecord> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, record: &SessionRecord) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(record.clone());
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Shared handle passed to the auth store and the gateway.
pub type SharedSessionStore = Arc<dyn SessionStore>;
