use super::*;
use crate::state::session::MemorySessionStore;
use time::macros::datetime;

// =============================================================
// Helpers
// =============================================================

fn alice(token: &str) -> User {
    User {
        id: "u-1".to_owned(),
        fullname: "Alice Example".to_owned(),
        username: "alice".to_owned(),
        email: "alice@example.com".to_owned(),
        roles: vec!["manager".to_owned()],
        token: Some(token.to_owned()),
    }
}

fn store_with(session: &MemorySessionStore) -> AuthStore {
    AuthStore::new(Arc::new(session.clone()))
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn auth_state_default_no_user() {
    let state = AuthState::default();
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

// =============================================================
// Transitions
// =============================================================

#[test]
fn start_sets_loading_and_clears_error() {
    let mut store = store_with(&MemorySessionStore::new());
    store.failure("old");
    store.start();
    assert!(store.state().loading);
    assert!(store.state().error.is_none());
}

#[test]
fn success_authenticates_and_persists() {
    let session = MemorySessionStore::new();
    let mut store = store_with(&session);
    store.start();
    let record = SessionRecord::new(alice("tok-1"), Some(datetime!(2030-01-01 0:00 UTC)));
    store.success(record.clone());

    let state = store.state();
    assert!(state.is_authenticated);
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.user.as_ref().map(|u| u.username.as_str()), Some("alice"));
    assert_eq!(session.get(), Some(record));
}

#[test]
fn failure_stops_loading_and_keeps_user_absent() {
    let session = MemorySessionStore::new();
    let mut store = store_with(&session);
    store.start();
    store.failure("Incorrect username or password.");
    assert!(!store.state().loading);
    assert_eq!(store.state().error.as_deref(), Some("Incorrect username or password."));
    assert!(!store.state().is_authenticated);
    assert!(session.get().is_none());
}

#[test]
fn set_mirrors_presence_into_is_authenticated() {
    let mut store = store_with(&MemorySessionStore::new());
    store.set(Some(SessionRecord::new(alice("tok"), None)));
    assert!(store.state().is_authenticated);
    store.set(None);
    assert!(!store.state().is_authenticated);
    assert!(store.user().is_none());
}

#[test]
fn update_token_rewrites_session_and_keeps_expiry() {
    let session = MemorySessionStore::new();
    let mut store = store_with(&session);
    let expiry = Some(datetime!(2030-01-01 0:00 UTC));
    store.success(SessionRecord::new(alice("tok-1"), expiry));

    assert!(store.update_token("tok-2"));
    assert_eq!(store.user().and_then(|u| u.token.as_deref()), Some("tok-2"));
    let persisted = session.get().unwrap();
    assert_eq!(persisted.user.token.as_deref(), Some("tok-2"));
    assert_eq!(persisted.expires_in, expiry);
}

#[test]
fn update_token_without_user_is_ignored() {
    let session = MemorySessionStore::new();
    let mut store = store_with(&session);
    assert!(!store.update_token("tok"));
    assert!(session.get().is_none());
}

#[test]
fn logout_clears_state_and_session() {
    let session = MemorySessionStore::new();
    let mut store = store_with(&session);
    store.success(SessionRecord::new(alice("tok"), None));
    store.logout();
    assert_eq!(store.state(), &AuthState::default());
    assert!(session.get().is_none());
}

#[test]
fn logout_is_idempotent() {
    let session = MemorySessionStore::new();
    let mut store = store_with(&session);
    store.success(SessionRecord::new(alice("tok"), None));
    store.logout();
    let once = store.state().clone();
    store.logout();
    assert_eq!(store.state(), &once);
    assert!(session.get().is_none());
}

#[test]
fn success_then_session_read_round_trips() {
    let session = MemorySessionStore::new();
    let mut store = store_with(&session);
    let record = SessionRecord::new(alice("tok"), None);
    store.success(record.clone());
    assert_eq!(store.session_record(), Some(record));
}

// =============================================================
// Tickets
// =============================================================

#[test]
fn newer_start_supersedes_older_ticket() {
    let mut store = store_with(&MemorySessionStore::new());
    let first = store.start();
    let second = store.start();
    assert!(!store.is_current(first));
    assert!(store.is_current(second));
}

#[test]
fn logout_invalidates_in_flight_ticket() {
    let mut store = store_with(&MemorySessionStore::new());
    let ticket = store.start();
    store.logout();
    assert!(!store.is_current(ticket));
}

#[test]
fn issue_ticket_leaves_visible_state_alone() {
    let mut store = store_with(&MemorySessionStore::new());
    let before = store.state().clone();
    let ticket = store.issue_ticket();
    assert!(store.is_current(ticket));
    assert_eq!(store.state(), &before);
}

// =============================================================
// Hydration
// =============================================================

#[test]
fn hydrate_restores_usable_record() {
    let session = MemorySessionStore::with_record(SessionRecord::new(alice("tok"), None));
    let mut store = store_with(&session);
    assert!(store.hydrate(datetime!(2030-01-01 0:00 UTC)));
    assert!(store.state().is_authenticated);
}

#[test]
fn hydrate_discards_expired_record() {
    let record = SessionRecord::new(alice("tok"), Some(datetime!(2020-01-01 0:00 UTC)));
    let session = MemorySessionStore::with_record(record);
    let mut store = store_with(&session);
    assert!(!store.hydrate(datetime!(2030-01-01 0:00 UTC)));
    assert!(!store.state().is_authenticated);
    assert!(session.get().is_none());
}

#[test]
fn hydrate_discards_tokenless_record() {
    let mut user = alice("tok");
    user.token = None;
    let session = MemorySessionStore::with_record(SessionRecord::new(user, None));
    let mut store = store_with(&session);
    assert!(!store.hydrate(datetime!(2030-01-01 0:00 UTC)));
    assert!(session.get().is_none());
}

// =============================================================
// Handles
// =============================================================

#[test]
fn refcell_handle_runs_closure() {
    let cell = std::cell::RefCell::new(store_with(&MemorySessionStore::new()));
    let loading = cell.with_store(|s| {
        s.start();
        s.state().loading
    });
    assert_eq!(loading, Some(true));
}

#[test]
fn usable_session_requires_live_record() {
    let session = MemorySessionStore::new();
    let mut store = store_with(&session);
    let now = datetime!(2030-01-01 0:00 UTC);
    assert!(!store.has_usable_session(now));

    store.success(SessionRecord::new(alice("tok"), Some(datetime!(2030-06-01 0:00 UTC))));
    assert!(store.has_usable_session(now));
    assert!(!store.has_usable_session(datetime!(2030-07-01 0:00 UTC)));

    session.clear();
    assert!(store.state().is_authenticated);
    assert!(!store.has_usable_session(now));
}
