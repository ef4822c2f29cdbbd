//! Qualification routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use contact_core::{LeadSource, QualificationCategory};
use database::{qualification, Qualification};
use reporting::{QualificationReport, QualificationStats};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// Default page size for list endpoints.
const DEFAULT_LIMIT: i64 = 50;
/// Hard ceiling on page size.
const MAX_LIMIT: i64 = 500;

/// Query parameters for the qualification list.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub source: Option<LeadSource>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated qualification list.
#[derive(Serialize)]
pub struct ListResponse {
    pub qualifications: Vec<Qualification>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// `GET /qualifications?source=&limit=&offset=`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let qualifications =
        qualification::list(state.db.pool(), params.source, limit, offset).await?;
    let total = qualification::count(state.db.pool(), params.source).await?;

    Ok(Json(ListResponse {
        qualifications,
        total,
        limit,
        offset,
    }))
}

/// `GET /qualifications/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<QualificationStats>> {
    let stats = reporting::qualification_stats(&state.db).await?;
    Ok(Json(stats))
}

/// `GET /qualifications/report`
pub async fn report(State(state): State<AppState>) -> Result<Json<QualificationReport>> {
    let report = reporting::qualification_report(&state.db).await?;
    Ok(Json(report))
}

/// Body for the manual category override.
#[derive(Debug, Deserialize)]
pub struct OverrideBody {
    pub category: QualificationCategory,
    pub notes: Option<String>,
}

/// `PUT /qualifications/:id/category`
///
/// Manual operator override; bypasses the automatic state machine.
pub async fn override_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<OverrideBody>,
) -> Result<Json<Qualification>> {
    let updated = qualifier::update_qualification_category(
        &state.db,
        &id,
        body.category,
        body.notes.as_deref(),
    )
    .await?;

    Ok(Json(updated))
}
