//! # Pull Tabs HTTP Service
//!
//! HTTP server that receives GitHub webhooks and relays labeled pull requests
//! to Slack.
//!
//! Routes:
//! - `POST /payload...` (any path starting with `/payload`): webhook intake
//! - `/` (any method): HTML status page
//! - anything else: `404 Not Found`
//!
//! An optional second listener serves Prometheus metrics at `/metrics`.

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod metrics;
pub mod middleware;
pub mod status;

pub use config::{ConfigError, DeliveryConfig, LoggingConfig, ServerConfig, ServiceConfig};
pub use dispatcher::{DeliveryError, SlackDispatcher};
pub use errors::{PayloadError, ServiceError};
pub use metrics::ServiceMetrics;
pub use middleware::RequestId;
pub use status::StatusPage;

use axum::{
    extract::{rejection::BytesRejection, DefaultBodyLimit, Extension, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use bytes::Bytes;
use pull_tabs_core::{
    events::parse_event, EventKind, FilterDecision, FilterPolicy, MessageFormatter,
    MetricsCollector, NotificationDispatcher, NotifierConfig, SignatureVerifier, WebhookEvent,
    WebhookOutcome, EVENT_TYPE_HEADER, SIGNATURE_HEADER,
};
use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

/// Path prefix of the webhook endpoint.
pub const PAYLOAD_PATH_PREFIX: &str = "/payload";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
///
/// Everything here is immutable after startup and cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Notifier configuration
    pub config: Arc<NotifierConfig>,

    /// `X-Hub-Signature` verifier bound to the configured secret
    pub verifier: Arc<SignatureVerifier>,

    /// Label / action / state policy
    pub policy: Arc<FilterPolicy>,

    /// Slack message formatter
    pub formatter: Arc<MessageFormatter>,

    /// Fire-and-forget delivery
    pub dispatcher: Arc<dyn NotificationDispatcher>,

    /// Metrics collector for observability
    pub metrics: Arc<dyn MetricsCollector>,

    /// Pre-compiled status page
    pub status_page: Arc<StatusPage>,

    /// Request body limit in bytes
    pub max_body_size: usize,
}

impl AppState {
    /// Create new application state from the notifier configuration.
    pub fn new(
        config: NotifierConfig,
        dispatcher: Arc<dyn NotificationDispatcher>,
        metrics: Arc<dyn MetricsCollector>,
        status_page: StatusPage,
    ) -> Self {
        let config = Arc::new(config);

        Self {
            verifier: Arc::new(SignatureVerifier::new(config.secret.clone())),
            policy: Arc::new(FilterPolicy::new(config.label.clone())),
            formatter: Arc::new(MessageFormatter::new(Arc::clone(&config))),
            config,
            dispatcher,
            metrics,
            status_page: Arc::new(status_page),
            max_body_size: ServerConfig::default().max_body_size,
        }
    }

    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }
}

// ============================================================================
// Router and Server
// ============================================================================

/// Create the webhook router.
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.max_body_size;

    Router::new()
        .route("/", any(handle_status))
        .fallback(handle_unrouted)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(
                    middleware::request_logging_middleware,
                ))
                .layer(DefaultBodyLimit::max(max_body_size))
                .into_inner(),
        )
        .with_state(state)
}

/// Create the Prometheus router served on the metrics port.
pub fn create_metrics_router(metrics: Arc<ServiceMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_endpoint))
        .with_state(metrics)
}

/// Start HTTP server
///
/// Builds the dispatcher, status page and metrics from `config`, binds the
/// listeners and serves until SIGINT/SIGTERM. In-flight requests get
/// `server.shutdown_timeout_seconds` to finish.
pub async fn start_server(config: ServiceConfig) -> Result<(), ServiceError> {
    let metrics = ServiceMetrics::new().map_err(|e| ServiceError::Initialization {
        component: "metrics".to_string(),
        message: e.to_string(),
    })?;

    let endpoint = config
        .notifier
        .slack_endpoint()
        .map_err(|e| ServiceError::Configuration(e.into()))?;

    let dispatcher = SlackDispatcher::new(endpoint, config.delivery.timeout(), metrics.clone())
        .map_err(|e| ServiceError::Initialization {
            component: "slack dispatcher".to_string(),
            message: e.to_string(),
        })?;

    let instance_id = config
        .server
        .instance_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let status_page = StatusPage::new(instance_id.clone(), config.notifier.label.clone())
        .map_err(|e| ServiceError::Initialization {
            component: "status page".to_string(),
            message: e.to_string(),
        })?;

    let state = AppState::new(
        config.notifier.clone(),
        Arc::new(dispatcher),
        metrics.clone(),
        status_page,
    )
    .with_max_body_size(config.server.max_body_size);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = bind(&addr).await?;

    if let Some(metrics_port) = config.server.metrics_port {
        let metrics_addr = format!("{}:{}", config.server.host, metrics_port);
        let metrics_listener = bind(&metrics_addr).await?;
        let metrics_app = create_metrics_router(metrics);

        info!("Serving metrics on {}", metrics_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_app).await {
                error!(error = %e, "Metrics listener failed");
            }
        });
    }

    info!(
        instance_id = %instance_id,
        label = %config.notifier.label,
        signature_verification = !config.notifier.secret.is_empty(),
        "Starting HTTP server on {}",
        addr
    );

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

    // The server stops accepting connections on the signal, then waits for
    // in-flight requests. Detached delivery tasks are not awaited.
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    let deadline = async move {
        if shutdown_rx.changed().await.is_ok() {
            tokio::time::sleep(shutdown_timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| ServiceError::ServerFailed {
                message: e.to_string(),
            })?;
        }
        _ = deadline => {
            warn!(
                "In-flight requests did not finish within {}s, forcing shutdown",
                shutdown_timeout.as_secs()
            );
        }
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

async fn bind(addr: &str) -> Result<tokio::net::TcpListener, ServiceError> {
    tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: addr.to_string(),
            message: e.to_string(),
        })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

// ============================================================================
// Webhook Handler
// ============================================================================

/// Handle a GitHub webhook delivery.
///
/// Steps, each of which may end the request:
/// 1. Read the body (`500` on failure)
/// 2. Verify `X-Hub-Signature` (`401`)
/// 3. Recognise `X-GitHub-Event` (`400` unless `ping` or `pull_request`)
/// 4. Decode the `pull_request` body (`400`)
/// 5. Apply the label policy and, on a match, dispatch the Slack message
///
/// Steps 1-4 produce a [`PayloadError`]. Step 5 always answers `200 OK`;
/// the delivery runs detached and its outcome is never reported here.
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn handle_payload(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, PayloadError> {
    let result = process_payload(&state, &request_id, &headers, body);

    match &result {
        Ok(outcome) => state.metrics.record_webhook_request(*outcome),
        Err(_) => state.metrics.record_webhook_request(WebhookOutcome::Rejected),
    }

    result.map(|_| StatusCode::OK)
}

fn process_payload(
    state: &AppState,
    request_id: &RequestId,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<WebhookOutcome, PayloadError> {
    let body = body.map_err(|e| PayloadError::BodyUnreadable {
        message: e.body_text(),
    })?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    if !state.verifier.verify(&body, signature) {
        info!("Signature invalid for request {}", request_id);
        state.metrics.record_signature_failure();
        return Err(PayloadError::InvalidSignature);
    }

    let event_type = headers
        .get(EVENT_TYPE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let kind = EventKind::from_header(event_type)?;

    let event = parse_event(kind, &body).inspect_err(|e| {
        info!(error = %e, "Failed to parse JSON for request {}", request_id);
    })?;

    let outcome = match event {
        WebhookEvent::Ping => WebhookOutcome::Ping,
        WebhookEvent::PullRequest(event) => match state.policy.evaluate(&event) {
            FilterDecision::Notify => {
                let message = state.formatter.format(&event);
                state.dispatcher.dispatch(message, request_id.as_str());
                WebhookOutcome::Notified
            }
            FilterDecision::Skip(reason) => {
                info!(
                    reason = reason.as_str(),
                    "Skipping message Action: {}\tLabel: {}\tState: {}",
                    event.action,
                    event.label_name(),
                    event.pull_request.state
                );
                state.metrics.record_notification_skipped(reason);
                WebhookOutcome::Skipped
            }
        },
    };

    info!(
        event_type = kind.as_str(),
        outcome = outcome.as_str(),
        "Successful handling of update for request {}",
        request_id
    );
    Ok(outcome)
}

// ============================================================================
// Status Page and Fallback
// ============================================================================

/// Serve the HTML status page. `HEAD` gets the headers without a body.
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn handle_status(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    method: Method,
) -> Response {
    let body = if method == Method::HEAD {
        String::new()
    } else {
        match state.status_page.render() {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, "Failed to render status page");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    };

    info!("Successfully served status page for request {}", request_id);

    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(status::STATUS_CONTENT_TYPE),
            ),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static(status::STATUS_CACHE_CONTROL),
            ),
        ],
        body,
    )
        .into_response()
}

/// Route `POST /payload*` to [`handle_payload`]; everything else is `404`.
async fn handle_unrouted(
    state: State<AppState>,
    request_id: Extension<RequestId>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::POST && uri.path().starts_with(PAYLOAD_PATH_PREFIX) {
        return handle_payload(state, request_id, headers, body)
            .await
            .into_response();
    }

    info!(
        request_id = %request_id.0,
        "No handler for method: {}\tpath: {}",
        method,
        uri.path()
    );
    StatusCode::NOT_FOUND.into_response()
}

// ============================================================================
// Metrics
// ============================================================================

async fn metrics_endpoint(State(metrics): State<Arc<ServiceMetrics>>) -> Response {
    match metrics.render() {
        Ok(text) => (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
