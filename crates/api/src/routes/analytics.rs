//! Contact analytics routes.

use axum::extract::{Query, State};
use axum::Json;
use contact_core::InterestLevel;
use database::{analytics, ContactAnalytics};
use reporting::AnalyticsSummary;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// Default page size for list endpoints.
const DEFAULT_LIMIT: i64 = 50;
/// Hard ceiling on page size.
const MAX_LIMIT: i64 = 500;

/// Query parameters for the analytics report list.
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub interest_level: Option<InterestLevel>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated analytics report list.
#[derive(Serialize)]
pub struct ReportsResponse {
    pub reports: Vec<ContactAnalytics>,
    pub total: i64,
}

/// `GET /contact-analytics/reports?interest_level=&limit=&offset=`
pub async fn reports(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<ReportsResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let reports =
        analytics::list(state.db.pool(), params.interest_level, limit, offset).await?;
    let total = analytics::count(state.db.pool(), params.interest_level).await?;

    Ok(Json(ReportsResponse { reports, total }))
}

/// `GET /contact-analytics/summary`
pub async fn summary(State(state): State<AppState>) -> Result<Json<AnalyticsSummary>> {
    let summary = reporting::analytics_summary(&state.db).await?;
    Ok(Json(summary))
}
