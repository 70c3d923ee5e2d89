//! Core types and credit calculation for the usage meter.
//!
//! This crate provides the foundational pieces used throughout the usage
//! metering service:
//!
//! - **Domain types**: `Message`, `Report`, `UsageEntry`, `UsageReport`
//! - **Credit engine**: `calculate`, `calculate_with_report`
//! - **Source interfaces**: `MessageSource`, `ReportSource`, `SourceError`
//!
//! # Credits
//!
//! A credit is the fixed-point billing unit charged per message. Credits
//! are `rust_decimal::Decimal` values rounded to 2 decimal places with
//! half-up rounding at the final step only, so intermediate rule arithmetic
//! stays exact.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod credits;
pub mod message;
pub mod report;
pub mod source;
pub mod usage;

pub use credits::{calculate, calculate_with_report};
pub use message::Message;
pub use report::Report;
pub use source::{MessageSource, ReportSource, SourceError};
pub use usage::{UsageEntry, UsageReport};
