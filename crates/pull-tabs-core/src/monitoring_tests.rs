//! Tests for metrics collection module.

use super::*;
use std::sync::Arc;

/// Test that NoOpMetricsCollector can be shared as a trait object.
#[test]
fn test_noop_collector_creation() {
    let collector = NoOpMetricsCollector;
    let _arc: Arc<dyn MetricsCollector> = Arc::new(collector);
}

/// Test that NoOpMetricsCollector is usable from several threads.
#[test]
fn test_noop_collector_thread_safety() {
    let collector: Arc<dyn MetricsCollector> = Arc::new(NoOpMetricsCollector);
    let collector_clone = Arc::clone(&collector);

    let handle = std::thread::spawn(move || {
        collector_clone.record_delivery(Duration::from_millis(5), false);
    });

    collector.record_delivery(Duration::from_millis(5), true);
    handle.join().unwrap();
}

/// Test that NoOpMetricsCollector accepts every recording call.
#[test]
fn test_noop_collector_records_everything() {
    let collector = NoOpMetricsCollector;

    collector.record_webhook_request(WebhookOutcome::Ping);
    collector.record_webhook_request(WebhookOutcome::Notified);
    collector.record_webhook_request(WebhookOutcome::Skipped);
    collector.record_webhook_request(WebhookOutcome::Rejected);
    collector.record_signature_failure();
    collector.record_notification_skipped(SkipReason::LabelMismatch);
}

#[test]
fn test_webhook_outcome_labels() {
    assert_eq!(WebhookOutcome::Notified.to_string(), "notified");
    assert_eq!(WebhookOutcome::Rejected.as_str(), "rejected");
}
