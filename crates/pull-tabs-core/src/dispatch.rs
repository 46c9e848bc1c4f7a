//! Fire-and-forget notification delivery.
//!
//! The webhook handler hands each formatted [`OutboundMessage`] to a
//! [`NotificationDispatcher`] and immediately acknowledges the webhook. What
//! happens next (serialization, the network call, failures) is the
//! dispatcher's business and is never reported back to the webhook sender.
//!
//! Delivery is at-most-once: there is no retry, backoff or dead-letter
//! storage. Each attempt ends in a [`DeliveryOutcome`] which implementations
//! log and record as a metric.

use crate::message::OutboundMessage;
use std::fmt;

/// Hands messages off for asynchronous delivery.
///
/// `dispatch` must return without waiting for the network. Implementations
/// typically spawn a detached task per message.
pub trait NotificationDispatcher: Send + Sync {
    /// Queue `message` for delivery. `request_id` correlates the delivery's
    /// log lines with the webhook request that caused it.
    fn dispatch(&self, message: OutboundMessage, request_id: &str);
}

/// Result of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The endpoint answered with a 2xx status.
    Delivered { status: u16 },

    /// The endpoint answered with a non-2xx status.
    Rejected { status: u16 },

    /// Connection failure, timeout or other transport error.
    TransportFailed { error: String },

    /// The message could not be encoded; no request was sent.
    SerializationFailed { error: String },
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Short label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered { .. } => "delivered",
            Self::Rejected { .. } => "rejected",
            Self::TransportFailed { .. } => "transport_failed",
            Self::SerializationFailed { .. } => "serialization_failed",
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered { status } => write!(f, "delivered (HTTP {})", status),
            Self::Rejected { status } => write!(f, "rejected (HTTP {})", status),
            Self::TransportFailed { error } => write!(f, "transport failed: {}", error),
            Self::SerializationFailed { error } => write!(f, "serialization failed: {}", error),
        }
    }
}

/// Dispatcher that drops every message. Useful when no endpoint is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDispatcher;

impl NotificationDispatcher for NoOpDispatcher {
    fn dispatch(&self, _message: OutboundMessage, _request_id: &str) {}
}
