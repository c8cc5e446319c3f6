//! Aggregate routes: dashboard, stats overview, global search.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_role;
use crate::routes::db_error;
use terralot_core::Role;
use terralot_db::StatsRepository;

/// Query parameters for the global search.
#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

/// Creates the admin aggregate routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/stats", get(overview))
        .route("/search", get(search))
}

/// GET /admin/dashboard - Headline numbers for the dashboard.
async fn dashboard(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = StatsRepository::new((*state.db).clone());
    match repo.dashboard().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            error!(error = %e, "failed to compute dashboard");
            db_error(&e)
        }
    }
}

/// GET /admin/stats - Site-wide totals and breakdowns.
async fn overview(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = StatsRepository::new((*state.db).clone());
    match repo.overview().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            error!(error = %e, "failed to compute stats");
            db_error(&e)
        }
    }
}

/// GET /admin/search?q= - Search properties, projects, clients, and services.
async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }
    let Some(term) = query.q.filter(|q| !q.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "q required" })),
        )
            .into_response();
    };

    let repo = StatsRepository::new((*state.db).clone());
    match repo.search(term.trim()).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => {
            error!(error = %e, "search failed");
            db_error(&e)
        }
    }
}
