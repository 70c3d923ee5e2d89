//! Usage aggregation for the current billing period.
//!
//! One aggregation run fetches the period's messages, resolves every
//! referenced report concurrently, and emits one billing entry per
//! message in the original order. Runs are fully independent and share
//! no state, so no locks are taken.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future;

use usage_meter_core::{
    calculate, calculate_with_report, Message, MessageSource, Report, ReportSource, SourceError,
    UsageEntry, UsageReport,
};

/// Builds the per-message usage list for a billing period.
#[derive(Debug, Clone)]
pub struct UsageService<S> {
    source: Arc<S>,
}

impl<S> UsageService<S>
where
    S: MessageSource + ReportSource,
{
    /// Create a usage service over the given message/report source.
    #[must_use]
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Compute usage for the current billing period.
    ///
    /// # Errors
    ///
    /// Propagates message-source failures and any report resolution
    /// failure other than "not found" unchanged.
    pub async fn current_period_usage(&self) -> Result<UsageReport, SourceError> {
        let messages = self.source.current_period_messages().await?;
        tracing::debug!(message_count = messages.len(), "aggregating usage");

        let usage = self.build_usage(&messages).await?;
        Ok(UsageReport { usage })
    }

    /// Build one usage entry per message, in message order.
    ///
    /// All referenced reports are resolved before any entry is built;
    /// a message whose report turned out not to exist falls back to
    /// rule-chain credits with no report name.
    ///
    /// # Errors
    ///
    /// Returns the first non-tolerated report resolution failure; no
    /// partial list is produced.
    pub async fn build_usage(&self, messages: &[Message]) -> Result<Vec<UsageEntry>, SourceError> {
        let reports = self.resolve_reports(messages).await?;

        Ok(messages
            .iter()
            .map(|message| {
                let report = message.report_id.and_then(|id| reports.get(&id));
                build_entry(message, report)
            })
            .collect())
    }

    /// Resolve every distinct referenced report concurrently.
    ///
    /// The fan-out is bounded by the number of distinct referenced ids
    /// and joined before the outcomes are examined. "Not found" drops
    /// the id from the map; any other failure aborts the aggregation.
    async fn resolve_reports(
        &self,
        messages: &[Message],
    ) -> Result<HashMap<u64, Report>, SourceError> {
        let ids = distinct_report_ids(messages);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        tracing::debug!(report_count = ids.len(), "resolving referenced reports");
        let outcomes = future::join_all(ids.into_iter().map(|id| self.source.report(id))).await;

        let mut resolved = HashMap::new();
        for outcome in outcomes {
            match outcome {
                Ok(report) => {
                    resolved.insert(report.id, report);
                }
                Err(SourceError::ReportNotFound { id }) => {
                    tracing::warn!(report_id = id, "report not found, using rule-chain credits");
                }
                Err(error) => return Err(error),
            }
        }

        Ok(resolved)
    }
}

/// Referenced report ids, deduplicated, in first-reference order.
fn distinct_report_ids(messages: &[Message]) -> Vec<u64> {
    let mut seen = HashSet::new();
    messages
        .iter()
        .filter_map(|message| message.report_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

fn build_entry(message: &Message, report: Option<&Report>) -> UsageEntry {
    let (report_name, credits_used) = match report {
        Some(report) => (Some(report.name.clone()), calculate_with_report(report)),
        None => (None, calculate(&message.text)),
    };

    UsageEntry {
        message_id: message.id,
        timestamp: message.timestamp.to_rfc3339(),
        report_name,
        credits_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    /// In-memory source; counts report resolution calls.
    struct FakeSource {
        messages: Vec<Message>,
        reports: HashMap<u64, Report>,
        failing_report_id: Option<u64>,
        report_calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(messages: Vec<Message>, reports: Vec<Report>) -> Arc<Self> {
            Arc::new(Self {
                messages,
                reports: reports.into_iter().map(|r| (r.id, r)).collect(),
                failing_report_id: None,
                report_calls: AtomicUsize::new(0),
            })
        }

        fn with_failing_report(mut self: Arc<Self>, id: u64) -> Arc<Self> {
            Arc::get_mut(&mut self).unwrap().failing_report_id = Some(id);
            self
        }

        fn report_calls(&self) -> usize {
            self.report_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MessageSource for FakeSource {
        async fn current_period_messages(&self) -> Result<Vec<Message>, SourceError> {
            Ok(self.messages.clone())
        }
    }

    #[async_trait]
    impl ReportSource for FakeSource {
        async fn report(&self, id: u64) -> Result<Report, SourceError> {
            self.report_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_report_id == Some(id) {
                return Err(SourceError::transport(format!("report {id}"), "upstream down"));
            }
            self.reports
                .get(&id)
                .cloned()
                .ok_or(SourceError::ReportNotFound { id })
        }
    }

    fn message(id: u64, text: &str, report_id: Option<u64>) -> Message {
        Message {
            id,
            text: text.into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            report_id,
        }
    }

    fn report(id: u64, name: &str, credit_cost: rust_decimal::Decimal) -> Report {
        Report {
            id,
            name: name.into(),
            credit_cost,
        }
    }

    #[tokio::test]
    async fn empty_input_produces_empty_output_without_resolution() {
        let source = FakeSource::new(vec![], vec![]);
        let service = UsageService::new(Arc::clone(&source));

        let usage = service.build_usage(&[]).await.unwrap();

        assert!(usage.is_empty());
        assert_eq!(source.report_calls(), 0);
    }

    #[tokio::test]
    async fn messages_without_references_skip_resolution() {
        let source = FakeSource::new(vec![], vec![]);
        let service = UsageService::new(Arc::clone(&source));
        let messages = vec![message(1, "hello there", None), message(2, "racecar", None)];

        let usage = service.build_usage(&messages).await.unwrap();

        assert_eq!(usage.len(), 2);
        assert_eq!(source.report_calls(), 0);
    }

    #[tokio::test]
    async fn resolves_each_distinct_report_once() {
        let source = FakeSource::new(
            vec![],
            vec![report(7, "Lease Summary", dec!(10.00))],
        );
        let service = UsageService::new(Arc::clone(&source));
        let messages = vec![
            message(1, "first", Some(7)),
            message(2, "second", Some(7)),
            message(3, "third", Some(7)),
        ];

        let usage = service.build_usage(&messages).await.unwrap();

        assert_eq!(usage.len(), 3);
        assert_eq!(source.report_calls(), 1);
        for entry in &usage {
            assert_eq!(entry.report_name.as_deref(), Some("Lease Summary"));
            assert_eq!(entry.credits_used, dec!(10.00));
        }
    }

    #[tokio::test]
    async fn missing_report_falls_back_to_rule_chain() {
        let source = FakeSource::new(
            vec![],
            vec![report(7, "Lease Summary", dec!(25.50))],
        );
        let service = UsageService::new(Arc::clone(&source));
        let messages = vec![
            message(1, "Generate the lease summary", Some(7)),
            message(2, "What rental amount is specified?", Some(9999)),
        ];

        let usage = service.build_usage(&messages).await.unwrap();

        assert_eq!(usage.len(), 2);
        assert_eq!(source.report_calls(), 2);

        assert_eq!(usage[0].report_name.as_deref(), Some("Lease Summary"));
        assert_eq!(usage[0].credits_used, dec!(25.50));

        // Message 2's report did not exist, so its text is charged
        // through the rule chain and no report name is attached.
        assert_eq!(usage[1].report_name, None);
        assert_eq!(usage[1].credits_used, dec!(2.80));
    }

    #[tokio::test]
    async fn fatal_resolution_failure_aborts_aggregation() {
        let source = FakeSource::new(
            vec![],
            vec![report(7, "Lease Summary", dec!(10.00))],
        )
        .with_failing_report(8);
        let service = UsageService::new(Arc::clone(&source));
        let messages = vec![
            message(1, "first", Some(7)),
            message(2, "second", Some(8)),
            message(3, "third", None),
        ];

        let error = service.build_usage(&messages).await.unwrap_err();

        assert!(matches!(error, SourceError::Transport { .. }));
        // Both resolutions ran; the failure surfaced only after the join.
        assert_eq!(source.report_calls(), 2);
    }

    #[tokio::test]
    async fn output_preserves_message_order() {
        let source = FakeSource::new(
            vec![],
            vec![report(7, "Lease Summary", dec!(10.00))],
        );
        let service = UsageService::new(Arc::clone(&source));
        let messages = vec![
            message(30, "third message arrives first", None),
            message(10, "with a report", Some(7)),
            message(20, "racecar", None),
        ];

        let usage = service.build_usage(&messages).await.unwrap();

        let ids: Vec<u64> = usage.iter().map(|entry| entry.message_id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn current_period_usage_charges_each_message() {
        let source = FakeSource::new(
            vec![
                message(1, "", None),
                message(2, "A man a plan a canal Panama", None),
            ],
            vec![],
        );
        let service = UsageService::new(Arc::clone(&source));

        let report = service.current_period_usage().await.unwrap();

        assert_eq!(report.usage.len(), 2);
        assert_eq!(report.usage[0].credits_used, dec!(2.00));
        assert_eq!(report.usage[1].credits_used, dec!(7.30));
        assert_eq!(report.usage[0].timestamp, "2024-01-01T10:00:00+00:00");
    }
}
