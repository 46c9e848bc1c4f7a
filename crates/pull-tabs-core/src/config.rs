//! Notifier configuration.
//!
//! [`NotifierConfig`] is built once at startup and shared read-only (behind an
//! `Arc`) by every request handler and delivery task. Nothing mutates it after
//! the server starts.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Label watched when none is configured.
pub const DEFAULT_LABEL: &str = "awaiting review";

/// Alert text used when none is configured.
pub const DEFAULT_MESSAGE: &str = "A Pull Request requires review";

// ============================================================================
// WebhookSecret
// ============================================================================

/// Shared secret used to verify `X-Hub-Signature` headers.
///
/// An empty secret disables verification entirely. The value never appears
/// in `Debug` output and is wiped from memory when dropped.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Wrap a raw secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns `true` when no secret is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw secret bytes, used as the HMAC key.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("WebhookSecret(<EMPTY>)")
        } else {
            f.write_str("WebhookSecret(<REDACTED>)")
        }
    }
}

impl Serialize for WebhookSecret {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if self.0.is_empty() { "" } else { "<REDACTED>" })
    }
}

// ============================================================================
// NotifierConfig
// ============================================================================

/// Settings that drive the notification pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Label that triggers a notification. Matched as a substring of the
    /// label attached by the `labeled` action.
    pub label: String,

    /// Alert text, used as the Slack message text and attachment fallback.
    pub message: String,

    /// Shared webhook secret. Empty means signature verification is skipped.
    pub secret: WebhookSecret,

    /// Slack incoming-webhook URL that receives the alert.
    pub slack_url: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
            secret: WebhookSecret::default(),
            slack_url: String::new(),
        }
    }
}

impl NotifierConfig {
    /// Create a configuration from its four settings.
    pub fn new(
        label: impl Into<String>,
        message: impl Into<String>,
        secret: WebhookSecret,
        slack_url: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
            secret,
            slack_url: slack_url.into(),
        }
    }

    /// Check that the configuration can drive the pipeline.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] when the label, message or Slack URL is empty
    /// - [`ConfigError::InvalidSlackUrl`] when the Slack URL does not parse or
    ///   is not `http`/`https`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "notifier.label".to_string(),
            });
        }

        if self.message.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "notifier.message".to_string(),
            });
        }

        if self.slack_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "notifier.slack_url".to_string(),
            });
        }

        self.slack_endpoint().map(|_| ())
    }

    /// Parse the Slack URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSlackUrl`] when the URL is malformed or
    /// uses a scheme other than `http`/`https`.
    pub fn slack_endpoint(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.slack_url).map_err(|e| ConfigError::InvalidSlackUrl {
            message: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidSlackUrl {
                message: format!("unsupported scheme '{}'", other),
            }),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Invalid Slack webhook URL: {message}")]
    InvalidSlackUrl { message: String },
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
