//! HTTP transport seam beneath the auth gateway.
//!
//! Browser (csr): real requests via `gloo-net`, raced against a timeout.
//! Elsewhere: every send reports [`ApiError::Unavailable`], which keeps the
//! gateway logic compilable and testable natively with a scripted transport.

#![allow(clippy::unused_async)]

use super::types::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully resolved outgoing request.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Bearer token for the `Authorization` header, if any.
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn authorization_header(&self) -> Option<String> {
        self.bearer.as_deref().map(|token| format!("Bearer {token}"))
    }
}

/// Raw status + body of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body does not match `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Sends requests to the backend. Enables mocking in tests.
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    /// Perform one request. Non-2xx statuses are responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] only when no response was obtained.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Transport backed by the browser `fetch` API.
#[derive(Clone, Copy, Debug)]
pub struct BrowserTransport {
    timeout_ms: u32,
}

impl BrowserTransport {
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            use futures::future::{Either, select};
            use gloo_net::http::Request;

            let exchange = async {
                let mut builder = match request.method {
                    Method::Get => Request::get(&request.url),
                    Method::Post => Request::post(&request.url),
                };
                if let Some(header) = request.authorization_header() {
                    builder = builder.header("Authorization", &header);
                }
                let outgoing = match &request.body {
                    Some(body) => builder.json(body),
                    None => builder.build(),
                }
                .map_err(|e| ApiError::Transport(e.to_string()))?;
                let resp = outgoing.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                Ok::<_, ApiError>(ApiResponse { status, body })
            };
            let timeout = gloo_timers::future::TimeoutFuture::new(self.timeout_ms);
            futures::pin_mut!(exchange, timeout);
            match select(exchange, timeout).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => Err(ApiError::Timeout(self.timeout_ms)),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (request, self.timeout_ms);
            Err(ApiError::Unavailable)
        }
    }
}
