//! Copilot API client implementation.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use async_trait::async_trait;
use usage_meter_core::{Message, MessageSource, Report, ReportSource, SourceError};

/// Options for constructing a [`CopilotClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self { timeout_seconds: 30 }
    }
}

/// Envelope around the message list returned by the upstream API.
#[derive(Debug, Deserialize)]
struct MessagesEnvelope {
    messages: Vec<Message>,
}

/// Client for the upstream Copilot message API.
///
/// Wraps a shared `reqwest::Client`; cloning is cheap and clones share
/// the connection pool.
#[derive(Debug, Clone)]
pub struct CopilotClient {
    client: Client,
    base_url: String,
}

impl CopilotClient {
    /// Create a new client for the given upstream base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Issue a GET and decode the JSON body, mapping failures onto the
    /// source error taxonomy. `not_found` converts an upstream 404 into
    /// its tagged outcome; endpoints without a tolerated 404 pass `None`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
        not_found: Option<SourceError>,
    ) -> Result<T, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| SourceError::transport(context, error))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(outcome) = not_found {
                return Err(outcome);
            }
        }
        if !status.is_success() {
            tracing::error!(%context, %status, "upstream returned failure status");
            return Err(SourceError::transport(
                context,
                format!("upstream returned status {status}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|error| SourceError::parse(context, error))
    }
}

#[async_trait]
impl MessageSource for CopilotClient {
    async fn current_period_messages(&self) -> Result<Vec<Message>, SourceError> {
        let url = format!("{}/messages/current-period", self.base_url);
        tracing::debug!(%url, "fetching current period messages");

        let envelope: MessagesEnvelope = self.get_json(&url, "messages", None).await?;
        tracing::debug!(count = envelope.messages.len(), "fetched messages");

        Ok(envelope.messages)
    }
}

#[async_trait]
impl ReportSource for CopilotClient {
    async fn report(&self, id: u64) -> Result<Report, SourceError> {
        let url = format!("{}/reports/{id}", self.base_url);
        tracing::debug!(%url, report_id = id, "fetching report");

        self.get_json(
            &url,
            &format!("report {id}"),
            Some(SourceError::ReportNotFound { id }),
        )
        .await
    }
}
