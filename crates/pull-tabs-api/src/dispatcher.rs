//! Slack incoming-webhook delivery.
//!
//! [`SlackDispatcher`] spawns one detached task per message. The task makes a
//! single POST attempt bounded by the configured timeout, then logs and
//! records the [`DeliveryOutcome`]. Nothing is reported back to the webhook
//! request that triggered it.

use pull_tabs_core::{DeliveryOutcome, MetricsCollector, NotificationDispatcher, OutboundMessage};
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn, Instrument};
use url::Url;

/// `Content-Type` sent with every Slack POST.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Errors building the dispatcher. Per-message failures are
/// [`DeliveryOutcome`]s, not errors.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Dispatcher posting to a Slack incoming-webhook URL.
#[derive(Clone)]
pub struct SlackDispatcher {
    client: reqwest::Client,
    endpoint: Url,
    metrics: Arc<dyn MetricsCollector>,
}

impl SlackDispatcher {
    /// Build a dispatcher whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::ClientBuild`] when the TLS backend cannot be
    /// initialised.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        metrics: Arc<dyn MetricsCollector>,
    ) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pull-tabs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            metrics,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl std::fmt::Debug for SlackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URL path is the Slack credential; only show the host.
        f.debug_struct("SlackDispatcher")
            .field("host", &self.endpoint.host_str())
            .finish_non_exhaustive()
    }
}

impl NotificationDispatcher for SlackDispatcher {
    fn dispatch(&self, message: OutboundMessage, request_id: &str) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let metrics = Arc::clone(&self.metrics);
        let span = info_span!("slack_delivery", request_id = %request_id);

        // Detached: the handle is dropped and the webhook response does not wait.
        tokio::spawn(
            async move {
                info!(title = %message.headline(), "Posting Slack message");

                let start = Instant::now();
                let outcome = deliver(&client, &endpoint, &message).await;
                metrics.record_delivery(start.elapsed(), outcome.is_success());

                match &outcome {
                    DeliveryOutcome::Delivered { status } => {
                        info!(status = status, "Slack message delivered");
                    }
                    other => {
                        warn!(outcome = other.as_str(), "Failed to post Slack message: {}", other);
                    }
                }
            }
            .instrument(span),
        );
    }
}

/// Make one delivery attempt.
///
/// Serializes `message`, POSTs it to `endpoint` and drains the response body
/// so the connection can be reused.
pub async fn deliver(
    client: &reqwest::Client,
    endpoint: &Url,
    message: &OutboundMessage,
) -> DeliveryOutcome {
    let body = match serde_json::to_vec(message) {
        Ok(body) => body,
        Err(e) => {
            return DeliveryOutcome::SerializationFailed {
                error: e.to_string(),
            }
        }
    };

    let response = match client
        .post(endpoint.clone())
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(body)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            return DeliveryOutcome::TransportFailed {
                error: e.to_string(),
            }
        }
    };

    let status = response.status();
    if let Err(e) = response.bytes().await {
        debug!(error = %e, "Failed to drain Slack response body");
    }

    if status.is_success() {
        DeliveryOutcome::Delivered {
            status: status.as_u16(),
        }
    } else {
        DeliveryOutcome::Rejected {
            status: status.as_u16(),
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
