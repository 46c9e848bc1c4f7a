//! Common test utilities for pull-tabs integration tests
//!
//! This module provides:
//! - A recording [`NotificationDispatcher`] that captures dispatched messages
//! - Builders for signed and unsigned webhook requests
//! - Shared payload fixtures

use axum::{body::Body, http::Request, Router};
use pull_tabs_api::{create_router, AppState, StatusPage};
use pull_tabs_core::{
    signature::compute_signature, NoOpMetricsCollector, NotificationDispatcher, NotifierConfig,
    OutboundMessage, WebhookSecret,
};
use std::sync::{Arc, Mutex};

/// Secret shared by the test sender and the app under test.
#[allow(dead_code)]
pub const TEST_SECRET: &str = "It's a Secret to Everybody";

#[allow(dead_code)]
pub const TEST_INSTANCE_ID: &str = "integration-instance";

// ============================================================================
// Recording Dispatcher
// ============================================================================

/// Dispatcher that records every message instead of delivering it
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct RecordingDispatcher {
    calls: Arc<Mutex<Vec<(OutboundMessage, String)>>>,
}

impl RecordingDispatcher {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }

    #[allow(dead_code)]
    pub fn request_ids(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, id)| id.clone())
            .collect()
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&self, message: OutboundMessage, request_id: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((message, request_id.to_string()));
    }
}

// ============================================================================
// App Builders
// ============================================================================

#[allow(dead_code)]
pub fn test_notifier_config(secret: &str) -> NotifierConfig {
    NotifierConfig::new(
        "awaiting review",
        "A Pull Request requires review",
        WebhookSecret::new(secret),
        "https://hooks.slack.com/services/T000/B000/XXXX",
    )
}

/// Build a state wired to the given dispatcher.
#[allow(dead_code)]
pub fn create_test_app_state(
    config: NotifierConfig,
    dispatcher: Arc<dyn NotificationDispatcher>,
) -> AppState {
    let status_page = StatusPage::new(TEST_INSTANCE_ID, config.label.clone()).unwrap();
    AppState::new(
        config,
        dispatcher,
        Arc::new(NoOpMetricsCollector),
        status_page,
    )
}

/// Router with [`TEST_SECRET`] and a fresh recording dispatcher.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, RecordingDispatcher) {
    let dispatcher = RecordingDispatcher::new();
    let state = create_test_app_state(
        test_notifier_config(TEST_SECRET),
        Arc::new(dispatcher.clone()),
    );
    (create_router(state), dispatcher)
}

// ============================================================================
// Request Builders
// ============================================================================

/// `pull_request` payload as GitHub sends it, trimmed to the fields we read.
#[allow(dead_code)]
pub fn pull_request_payload(action: &str, state: &str, label: &str, title: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "action": action,
        "number": 42,
        "label": {"name": label, "color": "fbca04"},
        "pull_request": {
            "number": 42,
            "state": state,
            "title": title,
            "html_url": "https://github.com/octo-org/widgets/pull/42",
            "user": {"login": "octocat"}
        },
        "repository": {"full_name": "octo-org/widgets"},
        "sender": {"login": "octocat"}
    }))
    .unwrap()
}

/// POST to `/payload` signed with [`TEST_SECRET`].
#[allow(dead_code)]
pub fn signed_webhook(event_type: &str, body: Vec<u8>) -> Request<Body> {
    let signature = compute_signature(TEST_SECRET, &body).unwrap();
    Request::builder()
        .method("POST")
        .uri("/payload")
        .header("content-type", "application/json")
        .header("x-github-event", event_type)
        .header("x-hub-signature", signature)
        .body(Body::from(body))
        .unwrap()
}

/// POST to `/payload` without an `X-Hub-Signature` header.
#[allow(dead_code)]
pub fn unsigned_webhook(event_type: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/payload")
        .header("content-type", "application/json")
        .header("x-github-event", event_type)
        .body(Body::from(body))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
