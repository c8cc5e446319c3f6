//! API route definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, middleware};
use serde_json::json;

use terralot_shared::AppError;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod audit_logs;
pub mod auth;
pub mod billing;
pub mod clients;
pub mod company_info;
pub mod deals;
pub mod exports;
pub mod health;
pub mod leads;
pub mod pages;
pub mod projects;
pub mod properties;
pub mod services;
pub mod stats;
pub mod uploads;
pub mod users;

/// Maps an [`AppError`] to its JSON response.
pub(crate) fn app_error(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = if err.echoes_details() {
        json!({ "error": "Database error", "details": err.to_string() })
    } else {
        json!({ "error": err.to_string() })
    };
    (status, Json(body)).into_response()
}

/// Builds the standard response for a failed database operation.
///
/// Unique-index violations (duplicate slug, email, or key) are caller
/// errors and surface as 409; everything else is a store failure.
pub(crate) fn db_error(e: &sea_orm::DbErr) -> Response {
    if let Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
        return app_error(&AppError::Conflict("Already exists".to_string()));
    }
    app_error(&AppError::Database(e.to_string()))
}

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Admin surface: everything behind the bearer token; role checks
    // happen per handler.
    let admin_routes = Router::new()
        .merge(services::admin_routes())
        .merge(properties::admin_routes())
        .merge(projects::admin_routes())
        .merge(leads::admin_routes())
        .merge(company_info::admin_routes())
        .merge(uploads::admin_routes())
        .merge(clients::admin_routes())
        .merge(deals::admin_routes())
        .merge(billing::admin_routes())
        .merge(users::admin_routes())
        .merge(audit_logs::admin_routes())
        .merge(stats::admin_routes())
        .merge(exports::admin_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(services::routes())
        .merge(properties::routes())
        .merge(projects::routes())
        .merge(leads::routes())
        .merge(pages::routes())
        .merge(company_info::routes())
        .merge(uploads::routes())
        .nest("/admin", admin_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let response = app_error(&AppError::Conflict("Slug already exists".to_string()));
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn store_errors_map_to_500() {
        let response = db_error(&sea_orm::DbErr::Custom("connection reset".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
