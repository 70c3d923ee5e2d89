//! Reports referenced by messages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A report generated by a message, fetched on demand from the upstream
/// report source and not persisted beyond one aggregation run.
///
/// When a message's report resolves, the report's `credit_cost` is the
/// message's credit cost and the rule chain is bypassed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unique report ID.
    pub id: u64,

    /// Display name, surfaced in usage entries.
    pub name: String,

    /// Fixed credit cost of generating this report. The upstream API
    /// sends this as a decimal string ("25.50"); plain JSON numbers are
    /// accepted too.
    pub credit_cost: Decimal,
}
