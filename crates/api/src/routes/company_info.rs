//! Company info routes: contact details, hours, social links.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_role;
use crate::routes::db_error;
use terralot_core::Role;
use terralot_db::ContentRepository;
use terralot_db::repositories::{
    AuditAction, AuditEntry, AuditRecorder, UpsertCompanyInfoInput, audit::snapshot,
};

/// Query parameters for the public listing.
#[derive(Debug, Deserialize)]
struct ListQuery {
    category: Option<String>,
}

/// Create/update payload for a company info entry.
#[derive(Debug, Deserialize)]
struct CompanyInfoPayload {
    key: Option<String>,
    value: Option<String>,
    category: Option<String>,
    label: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}

impl From<CompanyInfoPayload> for UpsertCompanyInfoInput {
    fn from(p: CompanyInfoPayload) -> Self {
        Self {
            value: p.value,
            category: p.category,
            label: p.label,
            sort_order: p.sort_order,
            is_active: p.is_active,
        }
    }
}

/// Creates the public company info routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/company-info", get(list_public))
        .route("/company-info/{key}", get(get_public))
}

/// Creates the admin company info routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/company-info", get(list_all).post(create_entry))
        .route(
            "/company-info/{key}",
            put(update_entry).delete(delete_entry),
        )
}

/// GET /company-info - Active entries as a category -> key -> value map.
async fn list_public(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = ContentRepository::new((*state.db).clone());
    match repo
        .list_company_info(query.category.as_deref(), true)
        .await
    {
        Ok(entries) => {
            let mut grouped: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
            for entry in entries {
                grouped
                    .entry(entry.category)
                    .or_default()
                    .insert(entry.key, entry.value);
            }
            Json(grouped).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list company info");
            db_error(&e)
        }
    }
}

/// GET /company-info/{key} - Fetch one active entry.
async fn get_public(State(state): State<AppState>, Path(key): Path<String>) -> impl IntoResponse {
    let repo = ContentRepository::new((*state.db).clone());
    match repo.find_company_info(&key).await {
        Ok(Some(entry)) if entry.is_active => Json(entry).into_response(),
        Ok(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Entry not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to fetch company info entry");
            db_error(&e)
        }
    }
}

/// GET /admin/company-info - List every entry, inactive included.
async fn list_all(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = ContentRepository::new((*state.db).clone());
    match repo
        .list_company_info(query.category.as_deref(), false)
        .await
    {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list company info");
            db_error(&e)
        }
    }
}

/// POST /admin/company-info - Create an entry.
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CompanyInfoPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }
    let Some(key) = payload.key.clone().filter(|k| !k.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "key required" })),
        )
            .into_response();
    };

    let repo = ContentRepository::new((*state.db).clone());
    match repo.create_company_info(key, payload.into()).await {
        Ok(entry) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Create,
                    entity: "CompanyInfo",
                    entity_id: Some(entry.id),
                    before: None,
                    after: snapshot(&entry),
                })
                .await;
            (StatusCode::CREATED, Json(entry)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to create company info entry");
            db_error(&e)
        }
    }
}

/// PUT /admin/company-info/{key} - Update an entry.
async fn update_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    Json(payload): Json<CompanyInfoPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = ContentRepository::new((*state.db).clone());
    let before = match repo.find_company_info(&key).await {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "failed to fetch company info entry");
            return db_error(&e);
        }
    };

    match repo.update_company_info(&key, payload.into()).await {
        Ok(Some(entry)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Update,
                    entity: "CompanyInfo",
                    entity_id: Some(entry.id),
                    before: before.as_ref().and_then(snapshot),
                    after: snapshot(&entry),
                })
                .await;
            Json(entry).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Entry not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to update company info entry");
            db_error(&e)
        }
    }
}

/// DELETE /admin/company-info/{key} - Delete an entry.
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = ContentRepository::new((*state.db).clone());
    match repo.delete_company_info(&key).await {
        Ok(Some(deleted)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Delete,
                    entity: "CompanyInfo",
                    entity_id: Some(deleted.id),
                    before: snapshot(&deleted),
                    after: None,
                })
                .await;
            Json(json!({ "ok": true })).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Entry not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to delete company info entry");
            db_error(&e)
        }
    }
}
