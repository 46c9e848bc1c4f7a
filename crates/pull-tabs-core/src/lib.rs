//! # Pull Tabs Core
//!
//! Domain logic for the Pull Tabs notifier: a relay that receives GitHub
//! `pull_request` webhooks, verifies them, and forwards an alert to Slack when
//! a pull request is tagged with the watched label.
//!
//! ## Architecture
//!
//! The pipeline is a straight line of pure steps followed by one detached
//! side effect:
//!
//! 1. [`signature`] - HMAC-SHA1 verification of the raw request body
//! 2. [`events`] - event-type recognition and payload decoding
//! 3. [`filter`] - label / action / state policy
//! 4. [`message`] - Slack message rendering
//! 5. [`dispatch`] - fire-and-forget delivery abstraction
//!
//! Infrastructure (HTTP server, Slack client, Prometheus) lives in
//! `pull-tabs-api` and is injected through the traits defined here.
//!
//! ## Usage
//!
//! ```rust
//! use pull_tabs_core::{
//!     events::{parse_event, EventKind, WebhookEvent},
//!     filter::should_notify,
//!     message::format_message,
//!     NotifierConfig,
//! };
//!
//! let config = NotifierConfig::default();
//! let body = br#"{"action":"labeled","label":{"name":"awaiting review"},
//!     "pull_request":{"state":"open","title":"Fix bug","html_url":"http://x/1"}}"#;
//!
//! let kind = EventKind::from_header("pull_request").unwrap();
//! if let WebhookEvent::PullRequest(event) = parse_event(kind, body).unwrap() {
//!     assert!(should_notify(&event, &config.label));
//!     let message = format_message(&event, &config);
//!     assert_eq!(message.attachments[0].title, "Fix bug");
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod events;
pub mod filter;
pub mod message;
pub mod monitoring;
pub mod signature;

pub use config::{ConfigError, NotifierConfig, WebhookSecret};
pub use dispatch::{DeliveryOutcome, NoOpDispatcher, NotificationDispatcher};
pub use monitoring::{MetricsCollector, NoOpMetricsCollector, WebhookOutcome};
pub use events::{EventError, EventKind, PullRequestEvent, WebhookEvent};
pub use filter::{FilterDecision, FilterPolicy, SkipReason};
pub use message::{Attachment, MessageFormatter, OutboundMessage};
pub use signature::{SignatureError, SignatureVerifier};

/// Header carrying the GitHub event type.
pub const EVENT_TYPE_HEADER: &str = "x-github-event";

/// Header carrying the HMAC-SHA1 signature of the request body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";
