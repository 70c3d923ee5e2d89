//! Per-message billing entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One billing line: the credits a single message used.
///
/// Exactly one entry is produced per message retrieved for the period,
/// in the order the messages were supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEntry {
    /// ID of the billed message.
    pub message_id: u64,

    /// The message timestamp as ISO-8601 text.
    pub timestamp: String,

    /// Name of the resolved report, when the message had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,

    /// Credits charged, already rounded to 2 decimal places. Serialized
    /// as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub credits_used: Decimal,
}

/// The usage list for a billing period, as served to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    /// One entry per message, in message order.
    pub usage: Vec<UsageEntry>,
}
