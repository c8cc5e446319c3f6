//! Deal routes, including payment schedules.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_role;
use crate::routes::db_error;
use terralot_core::Role;
use terralot_db::DealRepository;
use terralot_db::repositories::{
    AuditAction, AuditEntry, AuditRecorder, ScheduleInput, UpsertDealInput, audit::snapshot,
};

/// Create/update payload for a deal.
#[derive(Debug, Deserialize)]
struct DealPayload {
    client_id: Option<Uuid>,
    property_id: Option<Uuid>,
    kind: Option<String>,
    amount: Option<Decimal>,
    status: Option<String>,
    notes: Option<String>,
}

impl From<DealPayload> for UpsertDealInput {
    fn from(p: DealPayload) -> Self {
        Self {
            client_id: p.client_id,
            property_id: p.property_id,
            kind: p.kind,
            amount: p.amount,
            status: p.status,
            notes: p.notes,
        }
    }
}

/// Create/update payload for a schedule row.
#[derive(Debug, Deserialize)]
struct SchedulePayload {
    due_date: Option<NaiveDate>,
    amount: Option<Decimal>,
    status: Option<String>,
}

impl From<SchedulePayload> for ScheduleInput {
    fn from(p: SchedulePayload) -> Self {
        Self {
            due_date: p.due_date,
            amount: p.amount,
            status: p.status,
        }
    }
}

/// Creates the admin deal routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/deals", get(list_deals).post(create_deal))
        .route("/deals/{id}", put(update_deal).delete(delete_deal))
        .route("/deals/{id}/schedule", get(list_schedules).post(add_schedule))
        .route("/schedules/{id}", put(update_schedule))
}

/// GET /admin/deals - List deals with client and property.
async fn list_deals(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = DealRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(rows) => {
            let payload: Vec<Value> = rows
                .iter()
                .map(|(deal, client, property)| {
                    let mut value = snapshot(deal).unwrap_or_else(|| json!({}));
                    if let Value::Object(map) = &mut value {
                        map.insert(
                            "client".to_string(),
                            client.as_ref().and_then(snapshot).unwrap_or(Value::Null),
                        );
                        map.insert(
                            "property".to_string(),
                            property.as_ref().and_then(snapshot).unwrap_or(Value::Null),
                        );
                    }
                    value
                })
                .collect();
            Json(payload).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list deals");
            db_error(&e)
        }
    }
}

/// POST /admin/deals - Create a deal.
async fn create_deal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<DealPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }
    if payload.client_id.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "client_id required" })),
        )
            .into_response();
    }

    let repo = DealRepository::new((*state.db).clone());
    match repo.create(payload.into()).await {
        Ok(deal) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Create,
                    entity: "Deal",
                    entity_id: Some(deal.id),
                    before: None,
                    after: snapshot(&deal),
                })
                .await;
            (StatusCode::CREATED, Json(deal)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to create deal");
            db_error(&e)
        }
    }
}

/// PUT /admin/deals/{id} - Update a deal.
async fn update_deal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DealPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = DealRepository::new((*state.db).clone());
    let before = match repo.find_by_id(id).await {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "failed to fetch deal");
            return db_error(&e);
        }
    };

    match repo.update(id, payload.into()).await {
        Ok(Some(deal)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Update,
                    entity: "Deal",
                    entity_id: Some(deal.id),
                    before: before.as_ref().and_then(snapshot),
                    after: snapshot(&deal),
                })
                .await;
            Json(deal).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Deal not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to update deal");
            db_error(&e)
        }
    }
}

/// DELETE /admin/deals/{id} - Delete a deal and its billing rows.
async fn delete_deal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = DealRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(Some(deleted)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Delete,
                    entity: "Deal",
                    entity_id: Some(id),
                    before: snapshot(&deleted),
                    after: None,
                })
                .await;
            Json(json!({ "ok": true })).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Deal not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to delete deal");
            db_error(&e)
        }
    }
}

/// GET /admin/deals/{id}/schedule - List a deal's payment schedule.
async fn list_schedules(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = DealRepository::new((*state.db).clone());
    match repo.list_schedules(id).await {
        Ok(schedules) => Json(schedules).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list schedules");
            db_error(&e)
        }
    }
}

/// POST /admin/deals/{id}/schedule - Add a schedule row.
async fn add_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SchedulePayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }
    if payload.due_date.is_none() || payload.amount.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "due_date and amount required" })),
        )
            .into_response();
    }

    let repo = DealRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Deal not found" })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "failed to fetch deal");
            return db_error(&e);
        }
    }

    match repo.add_schedule(id, payload.into()).await {
        Ok(schedule) => (StatusCode::CREATED, Json(schedule)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to add schedule");
            db_error(&e)
        }
    }
}

/// PUT /admin/schedules/{id} - Update a schedule row.
async fn update_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SchedulePayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = DealRepository::new((*state.db).clone());
    match repo.update_schedule(id, payload.into()).await {
        Ok(Some(schedule)) => Json(schedule).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Schedule not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to update schedule");
            db_error(&e)
        }
    }
}
