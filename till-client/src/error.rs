//! Client error types
//!
//! [`ClientError`] covers the transport: failed requests and backend error
//! responses. [`PosError`] is what the session layer (scanning, checkout)
//! hands back to the operator.

use serde::Deserialize;
use shared::ValidationError;
use thiserror::Error;

/// Fallback text when the backend gives no usable message
const GENERIC_FAILURE: &str = "The request could not be completed";

/// Error body returned by the backend
///
/// ```json
/// { "statusCode": 404, "message": "Product not found", "error": "Not Found" }
/// ```
///
/// `message` is a list when several fields fail validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiErrorResponse {
    #[serde(default)]
    pub status_code: Option<u16>,
    pub message: ApiErrorMessage,
    #[serde(default)]
    #[allow(dead_code)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApiErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ApiErrorMessage {
    fn into_text(self) -> String {
        match self {
            ApiErrorMessage::One(s) => s,
            ApiErrorMessage::Many(list) => list.join("; "),
        }
    }
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The transport timed out waiting for the backend
    #[error("Request timed out")]
    Timeout,

    /// Backend returned a structured error
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication required
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (local or reported by the backend)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(err)
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Validation(err.0)
    }
}

impl ClientError {
    /// Map a non-success response to an error
    ///
    /// The structured backend body wins; otherwise the status decides.
    pub(crate) fn from_status(status: http::StatusCode, body: &[u8]) -> Self {
        if let Ok(api_err) = serde_json::from_slice::<ApiErrorResponse>(body) {
            return ClientError::Api {
                status: api_err.status_code.unwrap_or(status.as_u16()),
                message: api_err.message.into_text(),
            };
        }
        let text = String::from_utf8_lossy(body).trim().to_string();
        match status {
            http::StatusCode::UNAUTHORIZED => ClientError::Unauthorized(text),
            http::StatusCode::FORBIDDEN => ClientError::Forbidden(text),
            http::StatusCode::NOT_FOUND => ClientError::NotFound(text),
            http::StatusCode::BAD_REQUEST | http::StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(text)
            }
            _ => ClientError::Internal(text),
        }
    }

    /// HTTP status code, when the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message suitable for a dismissible notification
    ///
    /// The backend message is forwarded verbatim when there is one.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Unauthorized(text)
            | ClientError::Forbidden(text)
            | ClientError::NotFound(text)
            | ClientError::Validation(text)
            | ClientError::Internal(text)
                if !text.is_empty() =>
            {
                text.clone()
            }
            ClientError::Timeout => "The server took too long to respond".to_string(),
            ClientError::Http(_) => "Could not reach the server".to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Error surfaced by a point-of-sale action
///
/// None of these are fatal: the caller shows [`PosError::user_message`] and
/// keeps the session running.
#[derive(Debug, Error)]
pub enum PosError {
    /// Any failed backend call
    #[error("backend error: {0}")]
    Backend(#[from] ClientError),

    /// A scanned barcode did not resolve to a product
    #[error("product not found for barcode {code:?}: {source}")]
    ProductNotFound {
        code: String,
        #[source]
        source: ClientError,
    },

    /// Submission attempted with no cart lines
    #[error("cart is empty")]
    EmptyCart,

    /// Local input validation failed
    #[error("validation error: {0}")]
    Validation(String),

    /// A submission is already in flight on this checkout
    #[error("an invoice submission is already in progress")]
    SubmissionInProgress,

    /// The invoice was created but completing it failed; it stays pending
    /// server-side unless it was cancelled afterwards
    #[error("invoice {invoice_number} ({invoice_id}) was created but not completed: {source}")]
    CompletionFailed {
        invoice_id: String,
        invoice_number: String,
        #[source]
        source: ClientError,
    },
}

impl From<ValidationError> for PosError {
    fn from(err: ValidationError) -> Self {
        PosError::Validation(err.0)
    }
}

impl PosError {
    /// Message suitable for a dismissible notification
    pub fn user_message(&self) -> String {
        match self {
            PosError::Backend(e) => e.user_message(),
            PosError::ProductNotFound { .. } => "Product not found".to_string(),
            PosError::EmptyCart => "The cart is empty".to_string(),
            PosError::Validation(msg) => msg.clone(),
            PosError::SubmissionInProgress => "An invoice is already being submitted".to_string(),
            PosError::CompletionFailed { source, .. } => source.user_message(),
        }
    }
}

/// Result type for point-of-sale actions
pub type PosResult<T> = Result<T, PosError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_structured_error_body() {
        let body = br#"{"statusCode": 400, "message": "Insufficient stock for Vase", "error": "Bad Request"}"#;
        let err = ClientError::from_status(StatusCode::BAD_REQUEST, body);
        match &err {
            ClientError::Api { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "Insufficient stock for Vase");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.user_message(), "Insufficient stock for Vase");
    }

    #[test]
    fn test_message_list_is_joined() {
        let body = br#"{"statusCode": 400, "message": ["name should not be empty", "price must be a number"]}"#;
        let err = ClientError::from_status(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.user_message(),
            "name should not be empty; price must be a number"
        );
    }

    #[test]
    fn test_status_fallbacks() {
        let err = ClientError::from_status(StatusCode::NOT_FOUND, b"");
        assert!(matches!(err, ClientError::NotFound(_)));
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), GENERIC_FAILURE);

        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, b"upstream down");
        assert!(matches!(err, ClientError::Internal(_)));
        assert_eq!(err.user_message(), "upstream down");
    }

    #[test]
    fn test_api_status_from_body_wins() {
        let body = br#"{"statusCode": 404, "message": "Product with barcode 9 not found"}"#;
        let err = ClientError::from_status(StatusCode::BAD_REQUEST, body);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pos_error_messages() {
        assert_eq!(PosError::EmptyCart.user_message(), "The cart is empty");
        let err = PosError::ProductNotFound {
            code: "9".into(),
            source: ClientError::NotFound(String::new()),
        };
        assert_eq!(err.user_message(), "Product not found");

        let err = PosError::CompletionFailed {
            invoice_id: "inv-1".into(),
            invoice_number: "INV-1".into(),
            source: ClientError::Api {
                status: 409,
                message: "Insufficient stock".into(),
            },
        };
        assert_eq!(err.user_message(), "Insufficient stock");
        assert!(err.to_string().contains("INV-1"));
    }

    #[test]
    fn test_validation_conversion() {
        let err: PosError = ValidationError::new("name must not be empty").into();
        assert_eq!(err.user_message(), "name must not be empty");
    }
}
