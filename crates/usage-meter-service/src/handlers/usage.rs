//! Usage endpoint handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use usage_meter_core::UsageReport;

use crate::error::ApiError;
use crate::state::AppState;

/// Get usage for the current billing period.
///
/// Returns one entry per message the product processed this period, in
/// message order, with the credits each one used.
pub async fn get_usage(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UsageReport>, ApiError> {
    let report = state.usage.current_period_usage().await?;

    tracing::debug!(entries = report.usage.len(), "usage computed");
    Ok(Json(report))
}
