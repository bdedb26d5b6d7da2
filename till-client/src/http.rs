//! HTTP transport
//!
//! [`HttpClient`] is the seam between the typed API and the wire. The
//! network implementation talks to the backend with reqwest; the oneshot
//! implementation (feature `in-process`) drives an axum `Router` directly.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    fn token(&self) -> Option<&str>;
}

/// Decode a successful response body
///
/// An empty body decodes as JSON `null`, so `()` and `Option<T>` accept
/// bodiless `DELETE` responses.
pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(bytes)
        .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn send<T: DeserializeOwned>(&self, mut req: reqwest::RequestBuilder) -> ClientResult<T> {
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = req.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Response received");

        if !status.is_success() {
            return Err(ClientError::from_status(status, &body));
        }
        decode_body(&body)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    #[instrument(skip(self), fields(method = "GET"))]
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.client.get(self.url(path));
        self.send(req).await
    }

    #[instrument(skip(self, body), fields(method = "POST"))]
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.client.post(self.url(path)).json(body);
        self.send(req).await
    }

    #[instrument(skip(self), fields(method = "POST"))]
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.client.post(self.url(path));
        self.send(req).await
    }

    #[instrument(skip(self, body), fields(method = "PATCH"))]
    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.client.patch(self.url(path)).json(body);
        self.send(req).await
    }

    #[instrument(skip(self), fields(method = "DELETE"))]
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.client.delete(self.url(path));
        self.send(req).await
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
