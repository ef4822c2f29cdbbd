//! Route handlers for the read API.

pub mod analytics;
pub mod health;
pub mod qualifications;

use axum::routing::{get, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Qualifications
        .route("/qualifications", get(qualifications::list))
        .route("/qualifications/stats", get(qualifications::stats))
        .route("/qualifications/report", get(qualifications::report))
        .route(
            "/qualifications/:id/category",
            put(qualifications::override_category),
        )
        // Contact analytics
        .route("/contact-analytics/reports", get(analytics::reports))
        .route("/contact-analytics/summary", get(analytics::summary))
}
