//! Oneshot HTTP client - in-memory transport
//!
//! Requires the "in-process" feature.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::Request;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::ServiceExt;
use tracing::{debug, instrument};

use crate::http::{HttpClient, decode_body};
use crate::{ClientError, ClientResult};

/// Oneshot HTTP client (in-memory calls)
///
/// Drives an axum `Router` through Tower's `oneshot`, so a backend living in
/// the same process (an embedded server, or a fake in tests) can be called
/// with zero network overhead.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use till_client::OneshotHttpClient;
///
/// let router: Router = build_backend();
/// let client = OneshotHttpClient::new(router);
/// let products: Vec<Product> = client.get("/products").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
    token: Option<String>,
}

impl OneshotHttpClient {
    /// Create a new oneshot client
    ///
    /// # Arguments
    /// * `router` - Axum Router with its state already applied
    pub fn new(router: Router) -> Self {
        Self {
            router,
            token: None,
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn build_request(
        &self,
        method: http::Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ClientResult<Request<Body>> {
        let uri = format!("/{}", path.trim_start_matches('/'));
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = &self.token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(bytes) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                Body::from(bytes)
            }
            None => Body::empty(),
        };

        builder
            .body(body)
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))
    }

    fn build_request_with_body<B: Serialize>(
        &self,
        method: http::Method,
        path: &str,
        body: &B,
    ) -> ClientResult<Request<Body>> {
        let bytes = serde_json::to_vec(body)?;
        self.build_request(method, path, Some(bytes))
    }

    /// Execute the request and handle the response
    async fn execute<T: DeserializeOwned>(&self, request: Request<Body>) -> ClientResult<T> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {}", e)))?;
        debug!(status = status.as_u16(), bytes = body_bytes.len(), "Response received");

        if !status.is_success() {
            return Err(ClientError::from_status(status, &body_bytes));
        }
        decode_body(&body_bytes)
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    #[instrument(skip(self), fields(method = "GET"))]
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.build_request(http::Method::GET, path, None)?;
        self.execute(request).await
    }

    #[instrument(skip(self, body), fields(method = "POST"))]
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.build_request_with_body(http::Method::POST, path, body)?;
        self.execute(request).await
    }

    #[instrument(skip(self), fields(method = "POST"))]
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.build_request(http::Method::POST, path, None)?;
        self.execute(request).await
    }

    #[instrument(skip(self, body), fields(method = "PATCH"))]
    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.build_request_with_body(http::Method::PATCH, path, body)?;
        self.execute(request).await
    }

    #[instrument(skip(self), fields(method = "DELETE"))]
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.build_request(http::Method::DELETE, path, None)?;
        self.execute(request).await
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
