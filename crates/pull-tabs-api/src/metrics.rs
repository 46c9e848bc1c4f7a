//! Prometheus metrics for the webhook pipeline and Slack delivery.

use prometheus::{Encoder, Histogram, IntCounter, IntCounterVec, Registry, TextEncoder};
use pull_tabs_core::{
    monitoring::{MetricsCollector, WebhookOutcome},
    SkipReason,
};
use std::sync::Arc;
use std::time::Duration;

/// Service metrics for observability
///
/// Each instance owns its own [`Registry`], so building several (one per
/// test, say) never collides on metric names.
#[derive(Debug)]
pub struct ServiceMetrics {
    registry: Registry,

    // Webhook processing metrics
    pub webhook_requests_total: IntCounterVec,
    pub signature_failures_total: IntCounter,
    pub notifications_skipped_total: IntCounterVec,

    // Slack delivery metrics
    pub delivery_attempts_total: IntCounter,
    pub delivery_failures_total: IntCounter,
    pub delivery_duration_seconds: Histogram,
}

impl ServiceMetrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        use prometheus::{
            register_histogram_with_registry, register_int_counter_vec_with_registry,
            register_int_counter_with_registry,
        };

        let registry = Registry::new();

        Ok(Arc::new(Self {
            webhook_requests_total: register_int_counter_vec_with_registry!(
                "pull_tabs_webhook_requests_total",
                "Webhook requests by terminal outcome",
                &["outcome"],
                registry
            )?,
            signature_failures_total: register_int_counter_with_registry!(
                "pull_tabs_signature_failures_total",
                "Webhook requests rejected for a bad or missing signature",
                registry
            )?,
            notifications_skipped_total: register_int_counter_vec_with_registry!(
                "pull_tabs_notifications_skipped_total",
                "pull_request events filtered out, by reason",
                &["reason"],
                registry
            )?,

            delivery_attempts_total: register_int_counter_with_registry!(
                "pull_tabs_delivery_attempts_total",
                "Slack delivery attempts",
                registry
            )?,
            delivery_failures_total: register_int_counter_with_registry!(
                "pull_tabs_delivery_failures_total",
                "Slack delivery attempts that did not end in a 2xx response",
                registry
            )?,
            delivery_duration_seconds: register_histogram_with_registry!(
                "pull_tabs_delivery_duration_seconds",
                "Slack delivery attempt duration",
                vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0],
                registry
            )?,

            registry,
        }))
    }

    /// Encode every registered metric in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl MetricsCollector for ServiceMetrics {
    fn record_webhook_request(&self, outcome: WebhookOutcome) {
        self.webhook_requests_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    fn record_signature_failure(&self) {
        self.signature_failures_total.inc();
    }

    fn record_notification_skipped(&self, reason: SkipReason) {
        self.notifications_skipped_total
            .with_label_values(&[reason.as_str()])
            .inc();
    }

    fn record_delivery(&self, duration: Duration, success: bool) {
        self.delivery_attempts_total.inc();
        self.delivery_duration_seconds
            .observe(duration.as_secs_f64());
        if !success {
            self.delivery_failures_total.inc();
        }
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
