//! Data export routes: CSV or JSON dumps of backoffice entities.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_role;
use crate::routes::db_error;
use terralot_core::Role;
use terralot_core::export::csv_document;
use terralot_db::repositories::{ProjectFilter, PropertyFilter, audit::snapshot};
use terralot_db::{ClientRepository, DealRepository, ProjectRepository, PropertyRepository};

/// Query parameters for the custom export.
#[derive(Debug, Deserialize)]
struct CustomExportQuery {
    #[serde(rename = "type")]
    entity: Option<String>,
    format: Option<String>,
}

/// Creates the admin export routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/export/properties.csv", get(export_properties_csv))
        .route("/export/custom", get(export_custom))
}

fn csv_response(entity: &str, rows: &[Value]) -> Response {
    let body = csv_document(rows);
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{entity}.csv\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn snapshot_entity(state: &AppState, entity: &str) -> Result<Option<Vec<Value>>, Response> {
    let rows = match entity {
        "properties" => {
            let repo = PropertyRepository::new((*state.db).clone());
            match repo.list(&PropertyFilter::default()).await {
                Ok(rows) => rows
                    .iter()
                    .filter_map(|(property, _)| snapshot(property))
                    .collect(),
                Err(e) => {
                    error!(error = %e, "failed to export properties");
                    return Err(db_error(&e));
                }
            }
        }
        "projects" => {
            let repo = ProjectRepository::new((*state.db).clone());
            match repo.list(&ProjectFilter::default()).await {
                Ok(rows) => rows
                    .iter()
                    .filter_map(|(project, _)| snapshot(project))
                    .collect(),
                Err(e) => {
                    error!(error = %e, "failed to export projects");
                    return Err(db_error(&e));
                }
            }
        }
        "clients" => {
            let repo = ClientRepository::new((*state.db).clone());
            match repo.list().await {
                Ok(clients) => clients.iter().filter_map(snapshot).collect(),
                Err(e) => {
                    error!(error = %e, "failed to export clients");
                    return Err(db_error(&e));
                }
            }
        }
        "deals" => {
            let repo = DealRepository::new((*state.db).clone());
            match repo.list().await {
                Ok(rows) => rows.iter().filter_map(|(deal, _, _)| snapshot(deal)).collect(),
                Err(e) => {
                    error!(error = %e, "failed to export deals");
                    return Err(db_error(&e));
                }
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(rows))
}

/// GET /admin/export/properties.csv - Dump all properties as CSV.
async fn export_properties_csv(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = PropertyRepository::new((*state.db).clone());
    match repo.list(&PropertyFilter::default()).await {
        Ok(rows) => {
            let rows: Vec<Value> = rows
                .iter()
                .filter_map(|(property, _)| snapshot(property))
                .collect();
            csv_response("properties", &rows)
        }
        Err(e) => {
            error!(error = %e, "failed to export properties");
            db_error(&e)
        }
    }
}

/// GET /admin/export/custom?type=&format= - Dump an entity as CSV or JSON.
///
/// Supported types: properties, projects, clients, deals. The format
/// defaults to CSV.
async fn export_custom(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CustomExportQuery>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }
    let Some(entity) = query.entity.filter(|t| !t.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "type required" })),
        )
            .into_response();
    };

    let rows = match snapshot_entity(&state, entity.as_str()).await {
        Ok(Some(rows)) => rows,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Unknown export type" })),
            )
                .into_response();
        }
        Err(response) => return response,
    };

    match query.format.as_deref() {
        Some("json") => Json(rows).into_response(),
        _ => csv_response(&entity, &rows),
    }
}
