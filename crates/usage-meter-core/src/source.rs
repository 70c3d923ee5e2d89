//! Upstream source interfaces and their error taxonomy.
//!
//! The aggregation layer consumes messages and reports through these
//! traits; the HTTP client crate provides the production implementation.

use async_trait::async_trait;

use crate::{Message, Report};

/// Errors surfaced by the upstream sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The upstream was unreachable or answered with a failure status.
    #[error("failed to fetch {context}: {message}")]
    Transport {
        /// What was being fetched ("messages", "report 5392").
        context: String,
        /// Underlying failure description.
        message: String,
    },

    /// The upstream payload does not match the expected schema.
    #[error("failed to parse {context} response: {message}")]
    Parse {
        /// What was being parsed.
        context: String,
        /// Underlying decode failure description.
        message: String,
    },

    /// The requested report does not exist. This is an expected business
    /// outcome, not a defect: the aggregator recovers from it per
    /// message. It must never be conflated with a transport failure.
    #[error("report not found: {id}")]
    ReportNotFound {
        /// The report ID that was not found.
        id: u64,
    },
}

impl SourceError {
    /// Build a `Transport` error from any displayable cause.
    pub fn transport(context: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Transport {
            context: context.into(),
            message: cause.to_string(),
        }
    }

    /// Build a `Parse` error from any displayable cause.
    pub fn parse(context: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: cause.to_string(),
        }
    }
}

/// Source of the billing period's messages.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch all messages of the current billing period, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Transport`] if the upstream is unreachable
    /// or answers with a failure status, and [`SourceError::Parse`] if
    /// the response does not match the message schema.
    async fn current_period_messages(&self) -> Result<Vec<Message>, SourceError>;
}

/// Source of report details, fetched on demand per referenced report.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch a report by ID.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ReportNotFound`] when the report does not
    /// exist, [`SourceError::Transport`] on upstream failure and
    /// [`SourceError::Parse`] when the response cannot be decoded.
    async fn report(&self, id: u64) -> Result<Report, SourceError>;
}
