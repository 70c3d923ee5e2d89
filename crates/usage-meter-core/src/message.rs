//! Messages retrieved from the upstream message API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message sent through the product during the billing period.
///
/// Messages are produced solely by the upstream message source and are
/// immutable once retrieved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID.
    pub id: u64,

    /// Raw message text, arbitrary UTF-8.
    pub text: String,

    /// When the message was sent.
    pub timestamp: DateTime<Utc>,

    /// The report this message generated, if any. Absent and `null`
    /// both mean no report is attached.
    #[serde(default)]
    pub report_id: Option<u64>,
}
