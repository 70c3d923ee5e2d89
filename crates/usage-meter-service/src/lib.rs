//! Usage metering HTTP API service.
//!
//! This crate exposes the usage endpoint for the messaging product:
//!
//! - `GET /usage` - credit usage for the current billing period
//! - `GET /health` - liveness probe
//!
//! The non-trivial logic lives in [`usage::UsageService`], which resolves
//! the reports referenced by the period's messages concurrently and builds
//! one billing entry per message. Credit arithmetic itself comes from
//! `usage-meter-core`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Axum handlers all return Result
#![allow(clippy::missing_errors_doc)]
// The health handler needs async for Axum routing
#![allow(clippy::unused_async)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod usage;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use usage::UsageService;
