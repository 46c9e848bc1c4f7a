//! # Pull Tabs Service
//!
//! Binary entry point for the Pull Tabs notifier.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes logging
//! - Starts the HTTP server from pull-tabs-api

use pull_tabs_api::{start_server, LoggingConfig, ServiceConfig, ServiceError};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Configuration is read before logging is set up so that the logging
    // section can drive the subscriber. Load errors are reported right after.
    let loaded = load_config();

    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Pull Tabs");

    let service_config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!(
                error = %e,
                "Could not load service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    if let Err(e) = start_server(service_config).await {
        error!("Failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } | ServiceError::Initialization { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }
}

// ============================================================================
// Private helpers
// ============================================================================

/// Load the service configuration.
///
/// Sources, later ones overriding earlier ones:
///  1. `/etc/pull-tabs/service.yaml`
///  2. `./config/service.yaml`
///  3. The file named by `PULL_TABS_CONFIG_FILE` (required when set)
///  4. Environment variables prefixed `PULL_TABS__`, `__` separated,
///     e.g. `PULL_TABS__NOTIFIER__SLACK_URL`
///
/// Every field has a default, so missing files are fine. A malformed file
/// or a value of the wrong type is an error.
fn load_config() -> Result<ServiceConfig, config::ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/pull-tabs/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    if let Ok(explicit_path) = std::env::var("PULL_TABS_CONFIG_FILE") {
        if !explicit_path.is_empty() {
            builder = builder.add_source(
                config::File::with_name(&explicit_path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
        }
    }

    builder
        .add_source(config::Environment::with_prefix("PULL_TABS").separator("__"))
        .build()?
        .try_deserialize()
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &logging.level;
        format!(
            "pull_tabs_service={level},pull_tabs_api={level},pull_tabs_core={level},tower_http=debug"
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
