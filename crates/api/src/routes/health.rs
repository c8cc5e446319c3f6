//! Health check endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Overall status: "ok" or "degraded".
    pub status: &'static str,
    /// Database reachability: "up" or "down".
    pub database: &'static str,
}

const fn overall_status(database_up: bool) -> &'static str {
    if database_up { "ok" } else { "degraded" }
}

/// Health check handler. Degrades when the database does not answer a
/// ping; the endpoint itself always returns 200.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_up = state.db.ping().await.is_ok();
    Json(HealthResponse {
        service: "terralot-api",
        version: env!("CARGO_PKG_VERSION"),
        status: overall_status(database_up),
        database: if database_up { "up" } else { "down" },
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tracks_database_reachability() {
        assert_eq!(overall_status(true), "ok");
        assert_eq!(overall_status(false), "degraded");
    }
}
