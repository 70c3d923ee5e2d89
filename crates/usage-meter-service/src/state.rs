//! Application state.

use std::sync::Arc;

use usage_meter_client::{ClientOptions, CopilotClient};

use crate::config::ServiceConfig;
use crate::usage::UsageService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The usage aggregation service over the upstream client.
    pub usage: UsageService<CopilotClient>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create application state from configuration, building the
    /// upstream client.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let client = CopilotClient::with_options(
            &config.upstream_base_url,
            ClientOptions {
                timeout_seconds: config.upstream_timeout_seconds,
            },
        );
        tracing::info!(upstream = %config.upstream_base_url, "Upstream client configured");

        Self {
            usage: UsageService::new(Arc::new(client)),
            config,
        }
    }
}
