//! Metrics collection and monitoring.
//!
//! This module defines which metrics the pipeline records. The trait is
//! implemented by the infrastructure layer (`pull-tabs-api` with Prometheus)
//! so the domain code never depends on a metrics backend.
//!
//! Recording is best-effort: implementations never fail and never block the
//! request or the delivery task.
//!
//! # Examples
//!
//! ```rust
//! use pull_tabs_core::monitoring::{MetricsCollector, NoOpMetricsCollector, WebhookOutcome};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let metrics: Arc<dyn MetricsCollector> = Arc::new(NoOpMetricsCollector);
//!
//! metrics.record_webhook_request(WebhookOutcome::Notified);
//! metrics.record_signature_failure();
//! metrics.record_delivery(Duration::from_millis(120), true);
//! ```

use crate::filter::SkipReason;
use std::fmt;
use std::time::Duration;

/// Terminal state of one inbound webhook request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// `ping` acknowledged.
    Ping,
    /// Qualifying event; a delivery was dispatched.
    Notified,
    /// Parsed but filtered out by the policy.
    Skipped,
    /// Rejected with a 4xx/5xx response.
    Rejected,
}

impl WebhookOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Notified => "notified",
            Self::Skipped => "skipped",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for WebhookOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metrics collector for pipeline operations.
///
/// All methods take `&self` so a single `Arc<dyn MetricsCollector>` can be
/// shared by every request handler and delivery task.
pub trait MetricsCollector: Send + Sync {
    /// Record the terminal state of a webhook request.
    ///
    /// # Metrics Updated
    ///
    /// - `pull_tabs_webhook_requests_total{outcome}`: Incremented by 1
    fn record_webhook_request(&self, outcome: WebhookOutcome);

    /// Record a rejected `X-Hub-Signature`.
    ///
    /// # Metrics Updated
    ///
    /// - `pull_tabs_signature_failures_total`: Incremented by 1
    fn record_signature_failure(&self);

    /// Record an event filtered out by the label policy.
    ///
    /// # Metrics Updated
    ///
    /// - `pull_tabs_notifications_skipped_total{reason}`: Incremented by 1
    fn record_notification_skipped(&self, reason: SkipReason);

    /// Record one Slack delivery attempt.
    ///
    /// # Parameters
    ///
    /// - `duration`: Time from task start to outcome
    /// - `success`: Whether the endpoint accepted the message
    ///
    /// # Metrics Updated
    ///
    /// - `pull_tabs_delivery_attempts_total`: Incremented by 1
    /// - `pull_tabs_delivery_failures_total`: Incremented if !success
    /// - `pull_tabs_delivery_duration_seconds`: Histogram observation
    fn record_delivery(&self, duration: Duration, success: bool);
}

/// No-op metrics collector for testing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMetricsCollector;

impl MetricsCollector for NoOpMetricsCollector {
    fn record_webhook_request(&self, _outcome: WebhookOutcome) {}

    fn record_signature_failure(&self) {}

    fn record_notification_skipped(&self, _reason: SkipReason) {}

    fn record_delivery(&self, _duration: Duration, _success: bool) {}
}

#[cfg(test)]
#[path = "monitoring_tests.rs"]
mod tests;
