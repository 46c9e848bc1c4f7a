//! Error types for the HTTP service

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use pull_tabs_core::EventError;
use tracing::error;

/// Payload handler errors with HTTP status code mapping
///
/// Every variant is a per-request failure reported to the webhook sender.
/// Nothing that happens after the request is acknowledged (formatting,
/// delivery) ever becomes a `PayloadError`.
///
/// | Variant | Status |
/// |---------|--------|
/// | [`BodyUnreadable`](Self::BodyUnreadable) | `500 Internal Server Error` |
/// | [`InvalidSignature`](Self::InvalidSignature) | `401 Unauthorized` |
/// | [`UnsupportedEventType`](Self::UnsupportedEventType) | `400 Bad Request` |
/// | [`MalformedPayload`](Self::MalformedPayload) | `400 Bad Request` |
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The request body could not be read (connection dropped, size limit).
    #[error("Could not read request: {message}")]
    BodyUnreadable { message: String },

    /// `X-Hub-Signature` was missing or did not match the body.
    #[error("Signature invalid")]
    InvalidSignature,

    /// `X-GitHub-Event` was neither `ping` nor `pull_request`.
    #[error("Unsupported event type: {event_type}")]
    UnsupportedEventType { event_type: String },

    /// The `pull_request` body was not valid JSON of the expected shape.
    #[error("Failed to parse JSON: {message}")]
    MalformedPayload { message: String },
}

impl PayloadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BodyUnreadable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::UnsupportedEventType { .. } | Self::MalformedPayload { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Message returned to the client.
    fn client_message(&self) -> String {
        match self {
            // Reader errors can carry internal detail; keep it in the logs.
            Self::BodyUnreadable { message } => {
                error!(error = %message, "Could not read request body");
                "Could not read request".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<EventError> for PayloadError {
    fn from(error: EventError) -> Self {
        match error {
            EventError::UnsupportedEventType { event_type } => {
                Self::UnsupportedEventType { event_type }
            }
            EventError::MalformedPayload(e) => Self::MalformedPayload {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for PayloadError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.client_message(),
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, Json(body)).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Failed to initialise {component}: {message}")]
    Initialization { component: String, message: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
