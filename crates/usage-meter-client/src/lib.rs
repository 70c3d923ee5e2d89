//! HTTP client for the upstream Copilot message API.
//!
//! This crate provides [`CopilotClient`], the production implementation of
//! the `MessageSource` and `ReportSource` traits from `usage-meter-core`.
//!
//! # Example
//!
//! ```no_run
//! use usage_meter_client::{ClientOptions, CopilotClient};
//! use usage_meter_core::{MessageSource, ReportSource};
//!
//! # async fn example() -> Result<(), usage_meter_core::SourceError> {
//! let client = CopilotClient::new("https://owpublic.blob.core.windows.net/tech-task");
//!
//! let messages = client.current_period_messages().await?;
//! let report = client.report(5392).await?;
//! println!("{} messages, report {}", messages.len(), report.name);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;

pub use client::{ClientOptions, CopilotClient};
