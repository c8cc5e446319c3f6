//! Service catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_role;
use crate::routes::db_error;
use terralot_core::Role;
use terralot_db::ServiceRepository;
use terralot_db::repositories::UpsertServiceInput;

/// Create/update payload for a service.
#[derive(Debug, Deserialize)]
struct ServicePayload {
    name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    icon: Option<String>,
    slug: Option<String>,
}

impl From<ServicePayload> for UpsertServiceInput {
    fn from(p: ServicePayload) -> Self {
        Self {
            name: p.name,
            title: p.title,
            description: p.description,
            content: p.content,
            icon: p.icon,
            slug: p.slug,
        }
    }
}

/// Creates the public service routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services))
        .route("/services/{id}", get(get_service))
}

/// Creates the admin service routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/services", post(create_service))
        .route("/services/{id}", put(update_service).delete(delete_service))
}

/// GET /services - List all services.
async fn list_services(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ServiceRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(services) => Json(services).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list services");
            db_error(&e)
        }
    }
}

/// GET /services/{id} - Fetch one service.
async fn get_service(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ServiceRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(service)) => Json(service).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Service not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to fetch service");
            db_error(&e)
        }
    }
}

/// POST /admin/services - Create a service.
async fn create_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ServicePayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = ServiceRepository::new((*state.db).clone());
    match repo.create(payload.into()).await {
        Ok(service) => (StatusCode::CREATED, Json(service)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to create service");
            db_error(&e)
        }
    }
}

/// PUT /admin/services/{id} - Update a service.
async fn update_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServicePayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = ServiceRepository::new((*state.db).clone());
    match repo.update(id, payload.into()).await {
        Ok(Some(service)) => Json(service).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Service not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to update service");
            db_error(&e)
        }
    }
}

/// DELETE /admin/services/{id} - Delete a service.
async fn delete_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = ServiceRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(true) => Json(json!({ "ok": true })).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Service not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to delete service");
            db_error(&e)
        }
    }
}
