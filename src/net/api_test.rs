use super::*;
use crate::net::types::User;
use crate::state::session::{MemorySessionStore, SessionStore};
use std::sync::{Arc, Mutex};

// =========================================================================
// MockTransport
// =========================================================================

#[derive(Clone, Default)]
struct MockTransport {
    responses: Arc<Mutex<Vec<Result<ApiResponse, ApiError>>>>,
    sent: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    fn new(responses: Vec<Result<ApiResponse, ApiError>>) -> Self {
        Self { responses: Arc::new(Mutex::new(responses)), sent: Arc::default() }
    }

    fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.sent.lock().unwrap().push(request);
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

fn gateway(session: &MemorySessionStore, transport: &MockTransport) -> AuthGateway<MockTransport> {
    let config = ApiConfig::new("https://api.example.com/").unwrap();
    AuthGateway::new(config, Arc::new(session.clone()), transport.clone())
}

fn record_with_token(token: &str) -> SessionRecord {
    SessionRecord::new(
        User {
            id: "u-1".to_owned(),
            fullname: "Alice Example".to_owned(),
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            roles: vec!["admin".to_owned()],
            token: Some(token.to_owned()),
        },
        None,
    )
}

const SESSION_BODY: &str = r#"{"id":"u-1","fullname":"Alice Example","username":"alice",
    "email":"alice@example.com","roles":["admin"],"token":"tok-1","expiresIn":"2030-01-01T00:00:00Z"}"#;

// =========================================================================
// login
// =========================================================================

#[tokio::test]
async fn login_posts_credentials_and_decodes_session() {
    let session = MemorySessionStore::new();
    let transport = MockTransport::new(vec![respond(200, SESSION_BODY)]);
    let record = gateway(&session, &transport).login("alice", "secret1").await.unwrap();

    assert_eq!(record.user.username, "alice");
    assert_eq!(record.user.token.as_deref(), Some("tok-1"));

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].url, "https://api.example.com/api/auth/login");
    assert_eq!(sent[0].body, Some(serde_json::json!({ "username": "alice", "password": "secret1" })));
    assert!(sent[0].bearer.is_none());
}

#[tokio::test]
async fn login_rejection_surfaces_status() {
    let session = MemorySessionStore::new();
    let transport = MockTransport::new(vec![respond(401, "nope")]);
    let err = gateway(&session, &transport).login("alice", "wrong1").await.unwrap_err();
    assert!(err.is_rejection());
}

#[tokio::test]
async fn login_undecodable_body_is_decode_error() {
    let session = MemorySessionStore::new();
    let transport = MockTransport::new(vec![respond(200, "<html>")]);
    let err = gateway(&session, &transport).login("alice", "secret1").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// =========================================================================
// bearer token
// =========================================================================

#[tokio::test]
async fn bearer_token_is_read_at_call_time() {
    let session = MemorySessionStore::with_record(record_with_token("tok-old"));
    let transport = MockTransport::new(vec![respond(200, "[]"), respond(200, "[]")]);
    let gw = gateway(&session, &transport);

    gw.roles().await.unwrap();
    session.set(&record_with_token("tok-new"));
    gw.roles().await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].authorization_header().as_deref(), Some("Bearer tok-old"));
    assert_eq!(sent[1].authorization_header().as_deref(), Some("Bearer tok-new"));
}

// =========================================================================
// reset link
// =========================================================================

#[tokio::test]
async fn reset_link_requires_204() {
    let session = MemorySessionStore::new();
    let transport = MockTransport::new(vec![respond(204, ""), respond(200, "{}")]);
    let gw = gateway(&session, &transport);

    assert_eq!(gw.request_reset_link("alice smith").await, Ok(()));
    let err = gw.request_reset_link("alice").await.unwrap_err();
    assert_eq!(err.status(), Some(200));

    let sent = transport.sent();
    assert_eq!(sent[0].url, "https://api.example.com/api/auth/GetResetPasswordUrl?username=alice+smith");
    assert_eq!(sent[0].method, Method::Post);
}

// =========================================================================
// reset password
// =========================================================================

#[tokio::test]
async fn reset_password_success_returns_session() {
    let session = MemorySessionStore::new();
    let transport = MockTransport::new(vec![respond(200, SESSION_BODY)]);
    let outcome = gateway(&session, &transport).reset_password("t-1", "alice", "newpass").await.unwrap();
    let ResetPasswordOutcome::Success(record) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(record.user.username, "alice");
    assert_eq!(
        transport.sent()[0].body,
        Some(serde_json::json!({ "token": "t-1", "username": "alice", "password": "newpass" }))
    );
}

#[test]
fn classify_reset_response_maps_reused_password() {
    let resp = ApiResponse { status: 601, body: r#"{"token":"t-2"}"#.to_owned() };
    assert_eq!(
        classify_reset_response(&resp),
        Ok(ResetPasswordOutcome::PasswordReused { new_token: Some("t-2".to_owned()) })
    );
}

#[test]
fn classify_reset_response_tolerates_601_without_body() {
    let resp = ApiResponse { status: 601, body: String::new() };
    assert_eq!(classify_reset_response(&resp), Ok(ResetPasswordOutcome::PasswordReused { new_token: None }));
}

#[test]
fn classify_reset_response_maps_expired_and_other() {
    let expired = ApiResponse { status: 498, body: String::new() };
    assert_eq!(classify_reset_response(&expired), Ok(ResetPasswordOutcome::TokenExpired));
    let other = ApiResponse { status: 500, body: String::new() };
    assert_eq!(classify_reset_response(&other), Ok(ResetPasswordOutcome::Failed { status: 500 }));
    let created = ApiResponse { status: 201, body: String::new() };
    assert_eq!(classify_reset_response(&created), Ok(ResetPasswordOutcome::Failed { status: 201 }));
}

// =========================================================================
// lookups and misc endpoints
// =========================================================================

#[tokio::test]
async fn account_details_encodes_user_id_segment() {
    let session = MemorySessionStore::with_record(record_with_token("tok"));
    let transport = MockTransport::new(vec![respond(200, r#"{"id":"a/b","username":"alice"}"#)]);
    let details = gateway(&session, &transport).account_details("a/b").await.unwrap();
    assert_eq!(details.username, "alice");

    let sent = transport.sent();
    assert_eq!(sent[0].method, Method::Get);
    assert_eq!(sent[0].url, "https://api.example.com/api/auth/accountDetails/a%2Fb");
    assert!(sent[0].body.is_none());
}

#[tokio::test]
async fn roles_decodes_list() {
    let session = MemorySessionStore::new();
    let transport = MockTransport::new(vec![respond(200, r#"["admin","manager"]"#)]);
    let roles = gateway(&session, &transport).roles().await.unwrap();
    assert_eq!(roles.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), ["admin", "manager"]);
}

#[tokio::test]
async fn book_demo_and_default_password_hit_their_paths() {
    let session = MemorySessionStore::new();
    let transport = MockTransport::new(vec![respond(200, ""), respond(204, "")]);
    let gw = gateway(&session, &transport);
    gw.book_demo("bob@example.com", "Bob").await.unwrap();
    gw.reset_to_default_password("bob").await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].url, "https://api.example.com/api/auth/bookDemo");
    assert_eq!(sent[0].body, Some(serde_json::json!({ "email": "bob@example.com", "fullname": "Bob" })));
    assert_eq!(sent[1].url, "https://api.example.com/api/auth/ResetToDefaultPassword/bob");
}

#[tokio::test]
async fn transport_failure_propagates() {
    let session = MemorySessionStore::new();
    let transport = MockTransport::new(vec![Err(ApiError::Timeout(100))]);
    let err = gateway(&session, &transport).roles().await.unwrap_err();
    assert_eq!(err, ApiError::Timeout(100));
}
