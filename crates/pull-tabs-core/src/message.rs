//! Slack message rendering.
//!
//! A qualifying event becomes one [`OutboundMessage`] in Slack's legacy
//! attachment format:
//!
//! ```json
//! {
//!   "text": "A Pull Request requires review",
//!   "attachments": [{
//!     "fallback": "A Pull Request requires review",
//!     "color": "good",
//!     "pretext": "Pull request tagged with awaiting review",
//!     "title": "Fix bug",
//!     "title_link": "https://github.com/octo/repo/pull/1",
//!     "text": "Review me please"
//!   }]
//! }
//! ```
//!
//! Formatting cannot fail. Serialization to JSON happens later, in the
//! dispatcher.

use crate::{config::NotifierConfig, events::PullRequestEvent};
use serde::{Deserialize, Serialize};

/// Slack colour tag for a positive attachment.
pub const ATTACHMENT_COLOR: &str = "good";

/// Body text of the attachment.
pub const CALL_TO_ACTION: &str = "Review me please";

/// Slack attachment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub fallback: String,
    pub color: String,
    pub pretext: String,
    pub title: String,
    pub title_link: String,
    pub text: String,
}

/// Body of the Slack incoming-webhook POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl OutboundMessage {
    /// Title of the first attachment, used in delivery log lines.
    pub fn headline(&self) -> &str {
        self.attachments
            .first()
            .map(|a| a.title.as_str())
            .unwrap_or_default()
    }
}

/// Introductory line naming the watched label.
pub fn pretext_for(label: &str) -> String {
    format!("Pull request tagged with {}", label)
}

/// Render the alert for a qualifying event.
pub fn format_message(event: &PullRequestEvent, config: &NotifierConfig) -> OutboundMessage {
    OutboundMessage {
        text: config.message.clone(),
        attachments: vec![Attachment {
            fallback: config.message.clone(),
            color: ATTACHMENT_COLOR.to_string(),
            pretext: pretext_for(&config.label),
            title: event.pull_request.title.clone(),
            title_link: event.pull_request.html_url.clone(),
            text: CALL_TO_ACTION.to_string(),
        }],
    }
}

/// Formatter bound to the process configuration.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    config: std::sync::Arc<NotifierConfig>,
}

impl MessageFormatter {
    pub fn new(config: std::sync::Arc<NotifierConfig>) -> Self {
        Self { config }
    }

    pub fn format(&self, event: &PullRequestEvent) -> OutboundMessage {
        format_message(event, &self.config)
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
