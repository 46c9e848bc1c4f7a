//! GitHub webhook event recognition and payload decoding.
//!
//! Only two event types are accepted:
//!
//! | `X-GitHub-Event` | Handling |
//! |------------------|----------|
//! | `ping`           | Liveness check sent when the hook is created; body ignored |
//! | `pull_request`   | Body decoded into [`PullRequestEvent`] |
//!
//! Callers recognise the event type with [`EventKind::from_header`] first and
//! reject anything else before touching the body. Payload decoding ignores
//! fields it does not model and fills absent ones with empty defaults, so new
//! fields added by GitHub never break parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Event kind
// ============================================================================

/// Webhook event types this service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Ping,
    PullRequest,
}

impl EventKind {
    /// Recognise the value of the `X-GitHub-Event` header.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnsupportedEventType`] for any value other than
    /// `ping` or `pull_request`, including the empty string.
    pub fn from_header(value: &str) -> Result<Self, EventError> {
        match value {
            "ping" => Ok(Self::Ping),
            "pull_request" => Ok(Self::PullRequest),
            other => Err(EventError::UnsupportedEventType {
                event_type: other.to_string(),
            }),
        }
    }

    /// Header value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::PullRequest => "pull_request",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_header(s)
    }
}

// ============================================================================
// Payload types
// ============================================================================

/// Action reported by a `pull_request` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PullRequestAction {
    Assigned,
    Closed,
    Edited,
    Labeled,
    Opened,
    ReadyForReview,
    Reopened,
    ReviewRequested,
    Synchronize,
    Unassigned,
    Unlabeled,
    /// Any action this service does not name, kept verbatim.
    Other(String),
    /// The payload carried no action.
    #[default]
    Missing,
}

impl PullRequestAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Assigned => "assigned",
            Self::Closed => "closed",
            Self::Edited => "edited",
            Self::Labeled => "labeled",
            Self::Opened => "opened",
            Self::ReadyForReview => "ready_for_review",
            Self::Reopened => "reopened",
            Self::ReviewRequested => "review_requested",
            Self::Synchronize => "synchronize",
            Self::Unassigned => "unassigned",
            Self::Unlabeled => "unlabeled",
            Self::Other(action) => action,
            Self::Missing => "",
        }
    }
}

impl From<String> for PullRequestAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "assigned" => Self::Assigned,
            "closed" => Self::Closed,
            "edited" => Self::Edited,
            "labeled" => Self::Labeled,
            "opened" => Self::Opened,
            "ready_for_review" => Self::ReadyForReview,
            "reopened" => Self::Reopened,
            "review_requested" => Self::ReviewRequested,
            "synchronize" => Self::Synchronize,
            "unassigned" => Self::Unassigned,
            "unlabeled" => Self::Unlabeled,
            "" => Self::Missing,
            _ => Self::Other(value),
        }
    }
}

impl From<PullRequestAction> for String {
    fn from(value: PullRequestAction) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PullRequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of the pull request at the time of the event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PullRequestState {
    Open,
    Closed,
    Other(String),
    #[default]
    Missing,
}

impl PullRequestState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Other(state) => state,
            Self::Missing => "",
        }
    }
}

impl From<String> for PullRequestState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => Self::Open,
            "closed" => Self::Closed,
            "" => Self::Missing,
            _ => Self::Other(value),
        }
    }
}

impl From<PullRequestState> for String {
    fn from(value: PullRequestState) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author of the pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestUser {
    pub login: String,
}

/// The `pull_request` object of the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    pub html_url: String,
    pub state: PullRequestState,
    pub title: String,
    pub user: PullRequestUser,
}

/// Label attached (or removed) by the triggering action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub name: String,
}

/// Decoded `pull_request` webhook payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestEvent {
    pub action: PullRequestAction,
    pub number: u64,
    pub pull_request: PullRequest,
    pub label: Label,
}

impl PullRequestEvent {
    /// Name of the label attached by the action, empty when none.
    pub fn label_name(&self) -> &str {
        &self.label.name
    }
}

/// A recognised, decoded webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    Ping,
    PullRequest(PullRequestEvent),
}

impl WebhookEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ping => EventKind::Ping,
            Self::PullRequest(_) => EventKind::PullRequest,
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Decode the body of an event whose type has already been recognised.
///
/// `ping` bodies are not inspected.
///
/// # Errors
///
/// Returns [`EventError::MalformedPayload`] when a `pull_request` body is not
/// a JSON object matching [`PullRequestEvent`].
pub fn parse_event(kind: EventKind, body: &[u8]) -> Result<WebhookEvent, EventError> {
    match kind {
        EventKind::Ping => Ok(WebhookEvent::Ping),
        EventKind::PullRequest => parse_pull_request(body).map(WebhookEvent::PullRequest),
    }
}

/// Decode a `pull_request` payload.
///
/// # Errors
///
/// Returns [`EventError::MalformedPayload`] if `body` is not valid JSON of the
/// expected shape.
pub fn parse_pull_request(body: &[u8]) -> Result<PullRequestEvent, EventError> {
    serde_json::from_slice(body).map_err(EventError::MalformedPayload)
}

// ============================================================================
// Errors
// ============================================================================

/// Client-input errors raised while interpreting a webhook.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Unsupported event type: {event_type}")]
    UnsupportedEventType { event_type: String },

    #[error("Failed to parse JSON: {0}")]
    MalformedPayload(#[source] serde_json::Error),
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
