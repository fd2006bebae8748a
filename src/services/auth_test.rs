use super::*;
use crate::config::ApiConfig;
use crate::net::transport::{ApiRequest, ApiResponse};
use crate::state::auth::{AuthState, AuthStore};
use crate::state::session::{MemorySessionStore, SessionStore};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use time::macros::datetime;

// =========================================================================
// MockTransport
// =========================================================================

type Hook = Box<dyn Fn()>;

#[derive(Clone, Default)]
struct MockTransport {
    responses: Rc<Mutex<Vec<Result<ApiResponse, ApiError>>>>,
    on_send: Rc<RefCell<Option<Hook>>>,
}

impl MockTransport {
    fn new(responses: Vec<Result<ApiResponse, ApiError>>) -> Self {
        Self { responses: Rc::new(Mutex::new(responses)), on_send: Rc::default() }
    }

    /// Run `hook` while the request is "in flight".
    fn during_send(self, hook: impl Fn() + 'static) -> Self {
        *self.on_send.borrow_mut() = Some(Box::new(hook));
        self
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if let Some(hook) = self.on_send.borrow().as_ref() {
            hook();
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(ApiResponse { status: 500, body: String::new() })
        } else {
            responses.remove(0)
        }
    }
}

fn respond(status: u16, body: &str) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse { status, body: body.to_owned() })
}

fn setup(transport: &MockTransport) -> (MemorySessionStore, Rc<RefCell<AuthStore>>, AuthGateway<MockTransport>) {
    let session = MemorySessionStore::new();
    let shared: Arc<dyn SessionStore> = Arc::new(session.clone());
    let auth = Rc::new(RefCell::new(AuthStore::new(Arc::clone(&shared))));
    let config = ApiConfig::new("https://api.example.com/").unwrap();
    let gateway = AuthGateway::new(config, shared, transport.clone());
    (session, auth, gateway)
}

const ALICE_SESSION: &str = r#"{"id":"u-1","fullname":"Alice Example","username":"alice",
    "email":"alice@example.com","roles":["manager"],"token":"tok-1","expiresIn":"2030-01-01T00:00:00Z"}"#;

// =========================================================================
// login
// =========================================================================

#[tokio::test]
async fn login_with_valid_credentials_authenticates() {
    let transport = MockTransport::new(vec![respond(200, ALICE_SESSION)]);
    let (session, auth, gateway) = setup(&transport);

    let outcome = login(&gateway, auth.as_ref(), Locale::En, "alice", "secret1").await;

    assert_eq!(outcome, LoginOutcome::SignedIn);
    let store = auth.borrow();
    let state = store.state();
    assert!(state.is_authenticated);
    assert_eq!(state.user.as_ref().map(|u| u.username.as_str()), Some("alice"));
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(session.get().and_then(|r| r.user.token), Some("tok-1".to_owned()));
}

#[tokio::test]
async fn login_rejection_sets_generic_message() {
    let transport = MockTransport::new(vec![respond(401, "unknown user")]);
    let (session, auth, gateway) = setup(&transport);

    let outcome = login(&gateway, auth.as_ref(), Locale::En, "mallory", "whatever").await;

    assert_eq!(outcome, LoginOutcome::Rejected);
    let store = auth.borrow();
    assert_eq!(store.state().error.as_deref(), Some("Incorrect username or password."));
    assert!(!store.state().loading);
    assert!(!store.state().is_authenticated);
    assert!(session.get().is_none());
}

#[tokio::test]
async fn login_network_failure_reports_network_error() {
    let transport = MockTransport::new(vec![Err(ApiError::Transport("offline".to_owned()))]);
    let (_session, auth, gateway) = setup(&transport);

    let outcome = login(&gateway, auth.as_ref(), Locale::En, "alice", "secret1").await;

    assert_eq!(outcome, LoginOutcome::NetworkError);
    assert_eq!(auth.borrow().state().error.as_deref(), Some(t(Locale::En, Msg::NetworkError)));
}

#[tokio::test]
async fn login_server_error_is_generic_failure() {
    let transport = MockTransport::new(vec![respond(500, "")]);
    let (_session, auth, gateway) = setup(&transport);
    let outcome = login(&gateway, auth.as_ref(), Locale::Ru, "alice", "secret1").await;
    assert_eq!(outcome, LoginOutcome::Failed);
    assert_eq!(auth.borrow().state().error.as_deref(), Some(t(Locale::Ru, Msg::GeneralError)));
}

#[tokio::test]
async fn login_response_after_logout_is_discarded() {
    let transport = MockTransport::new(vec![respond(200, ALICE_SESSION)]);
    let (session, auth, gateway) = setup(&transport);
    let auth_hook = Rc::clone(&auth);
    let transport_with_hook = transport.clone().during_send(move || auth_hook.borrow_mut().logout());
    let gateway = AuthGateway::new(gateway.config().clone(), Arc::new(session.clone()), transport_with_hook);

    let outcome = login(&gateway, auth.as_ref(), Locale::En, "alice", "secret1").await;

    assert_eq!(outcome, LoginOutcome::Superseded);
    assert!(!auth.borrow().state().is_authenticated);
    assert!(session.get().is_none());
}

#[tokio::test]
async fn newer_login_supersedes_older_failure() {
    let transport = MockTransport::new(vec![respond(401, "")]);
    let (_session, auth, gateway) = setup(&transport);
    let auth_hook = Rc::clone(&auth);
    let transport_with_hook = transport.clone().during_send(move || {
        auth_hook.borrow_mut().start();
    });
    let gateway = AuthGateway::new(gateway.config().clone(), Arc::new(MemorySessionStore::new()), transport_with_hook);

    let outcome = login(&gateway, auth.as_ref(), Locale::En, "alice", "wrong1").await;

    assert_eq!(outcome, LoginOutcome::Superseded);
    let store = auth.borrow();
    assert!(store.state().error.is_none());
    assert!(store.state().loading);
}

// =========================================================================
// reset link
// =========================================================================

#[tokio::test]
async fn reset_link_outcomes() {
    let transport = MockTransport::new(vec![
        respond(204, ""),
        respond(404, ""),
        Err(ApiError::Timeout(100_000)),
    ]);
    let (_session, auth, gateway) = setup(&transport);

    assert_eq!(request_reset_link(&gateway, "alice").await, ResetLinkOutcome::Sent);
    assert_eq!(request_reset_link(&gateway, "nobody").await, ResetLinkOutcome::UnknownUser);
    assert_eq!(request_reset_link(&gateway, "alice").await, ResetLinkOutcome::NetworkError);
    assert_eq!(auth.borrow().state(), &AuthState::default());
}

// =========================================================================
// reset password
// =========================================================================

#[tokio::test]
async fn reset_token_expired_leaves_state_untouched() {
    let transport = MockTransport::new(vec![respond(498, "")]);
    let (session, auth, gateway) = setup(&transport);
    let before = auth.borrow().state().clone();

    let outcome = reset_password(&gateway, auth.as_ref(), "t-1", "alice", "newpass").await;

    assert_eq!(outcome, ResetFlowOutcome::TokenExpired);
    assert_eq!(auth.borrow().state(), &before);
    assert!(session.get().is_none());
}

#[tokio::test]
async fn reset_password_reused_returns_new_token() {
    let transport = MockTransport::new(vec![respond(601, r#"{"token":"t-2"}"#)]);
    let (session, auth, gateway) = setup(&transport);

    let outcome = reset_password(&gateway, auth.as_ref(), "t-1", "alice", "oldpass").await;

    assert_eq!(outcome, ResetFlowOutcome::PasswordReused { new_token: Some("t-2".to_owned()) });
    assert!(!auth.borrow().state().is_authenticated);
    assert!(session.get().is_none());
}

#[tokio::test]
async fn reset_password_success_signs_in() {
    let transport = MockTransport::new(vec![respond(200, ALICE_SESSION)]);
    let (session, auth, gateway) = setup(&transport);

    let outcome = reset_password(&gateway, auth.as_ref(), "t-1", "alice", "newpass").await;

    assert_eq!(outcome, ResetFlowOutcome::Completed);
    assert!(auth.borrow().state().is_authenticated);
    let record = session.get().unwrap();
    assert_eq!(record.expires_in, Some(datetime!(2030-01-01 0:00 UTC)));
}

#[tokio::test]
async fn reset_password_other_status_and_network() {
    let transport = MockTransport::new(vec![respond(400, ""), Err(ApiError::Transport("down".to_owned()))]);
    let (_session, auth, gateway) = setup(&transport);
    assert_eq!(reset_password(&gateway, auth.as_ref(), "t", "a", "pw1").await, ResetFlowOutcome::Failed);
    assert_eq!(reset_password(&gateway, auth.as_ref(), "t", "a", "pw1").await, ResetFlowOutcome::NetworkError);
}

// =========================================================================
// session lifecycle
// =========================================================================

#[tokio::test]
async fn logout_after_login_clears_everything() {
    let transport = MockTransport::new(vec![respond(200, ALICE_SESSION)]);
    let (session, auth, gateway) = setup(&transport);
    login(&gateway, auth.as_ref(), Locale::En, "alice", "secret1").await;

    logout(auth.as_ref());
    logout(auth.as_ref());

    assert_eq!(auth.borrow().state(), &AuthState::default());
    assert!(session.get().is_none());
}

#[test]
fn restore_session_respects_expiry() {
    let transport = MockTransport::new(vec![]);
    let (session, auth, _gateway) = setup(&transport);
    session.set(&serde_json::from_str(ALICE_SESSION).unwrap());

    assert!(restore_session(auth.as_ref(), datetime!(2029-06-01 0:00 UTC)));
    assert!(auth.borrow().state().is_authenticated);

    assert!(!restore_session(auth.as_ref(), datetime!(2031-01-01 0:00 UTC)));
    assert!(!auth.borrow().state().is_authenticated);
    assert!(session.get().is_none());
}

#[tokio::test]
async fn account_overview_combines_lookups() {
    let transport = MockTransport::new(vec![
        respond(200, r#"{"id":"u-1","username":"alice","roles":["manager"]}"#),
        respond(200, r#"["admin","manager"]"#),
    ]);
    let (_session, _auth, gateway) = setup(&transport);
    let overview = load_account_overview(&gateway, "u-1").await.unwrap();
    assert_eq!(overview.details.username, "alice");
    assert_eq!(overview.roles.len(), 2);
}

// =========================================================================
// operator calls
// =========================================================================

#[tokio::test]
async fn book_demo_and_default_reset_leave_session_alone() {
    let transport = MockTransport::new(vec![respond(200, ""), respond(500, "")]);
    let (session, auth, gateway) = setup(&transport);

    assert!(book_demo(&gateway, "bob@example.com", "Bob").await.is_ok());
    let err = reset_to_default_password(&gateway, "bob").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(session.get().is_none());
    assert!(!auth.borrow().state().is_authenticated);
}
