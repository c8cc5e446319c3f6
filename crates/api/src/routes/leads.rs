//! Contact lead routes: the public form and backoffice follow-up.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_role;
use crate::routes::db_error;
use terralot_core::Role;
use terralot_db::LeadRepository;
use terralot_db::repositories::CreateLeadInput;

/// Contact form payload.
#[derive(Debug, Deserialize)]
struct ContactPayload {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    message: Option<String>,
    property_id: Option<Uuid>,
}

/// Query parameters for the lead list.
#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
}

/// Follow-up payload.
#[derive(Debug, Deserialize)]
struct LeadUpdatePayload {
    status: Option<String>,
    notes: Option<String>,
}

/// Creates the public lead routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/leads", post(create_lead))
}

/// Creates the admin lead routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/leads", get(list_leads))
        .route("/leads/{id}", patch(update_lead))
}

/// POST /leads - Record a contact form submission.
async fn create_lead(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> impl IntoResponse {
    let (Some(name), Some(message)) = (payload.name, payload.message) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Name and message required" })),
        )
            .into_response();
    };
    if name.trim().is_empty() || message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Name and message required" })),
        )
            .into_response();
    }

    let repo = LeadRepository::new((*state.db).clone());
    match repo
        .create(CreateLeadInput {
            name,
            email: payload.email,
            phone: payload.phone,
            message,
            property_id: payload.property_id,
        })
        .await
    {
        Ok(lead) => {
            info!(lead_id = %lead.id, "contact lead recorded");
            (StatusCode::CREATED, Json(lead)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to record lead");
            db_error(&e)
        }
    }
}

/// GET /admin/leads - List leads, newest first, capped at 100.
async fn list_leads(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = LeadRepository::new((*state.db).clone());
    match repo.list(query.status.as_deref()).await {
        Ok(leads) => Json(leads).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list leads");
            db_error(&e)
        }
    }
}

/// PATCH /admin/leads/{id} - Update a lead's status and notes.
async fn update_lead(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadUpdatePayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = LeadRepository::new((*state.db).clone());
    match repo.update(id, payload.status, payload.notes).await {
        Ok(Some(lead)) => Json(lead).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Lead not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to update lead");
            db_error(&e)
        }
    }
}
