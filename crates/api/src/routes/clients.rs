//! Client and co-ownership routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
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
use terralot_db::{ClientRepository, PropertyRepository};
use terralot_db::repositories::{
    AuditAction, AuditEntry, AuditRecorder, CoOwnershipInput, UpsertClientInput, audit::snapshot,
};

/// Create/update payload for a client.
#[derive(Debug, Deserialize)]
struct ClientPayload {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    notes: Option<String>,
}

impl From<ClientPayload> for UpsertClientInput {
    fn from(p: ClientPayload) -> Self {
        Self {
            name: p.name,
            email: p.email,
            phone: p.phone,
            address: p.address,
            notes: p.notes,
        }
    }
}

/// Payload for registering a co-ownership share.
#[derive(Debug, Deserialize)]
struct CoOwnerPayload {
    client_id: Uuid,
    share: Decimal,
}

/// Creates the admin client routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route(
            "/properties/{id}/co-owners",
            get(list_co_owners).post(add_co_owner),
        )
        .route("/co-owners/{id}", delete(delete_co_owner))
}

/// GET /admin/clients - List clients alphabetically.
async fn list_clients(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = ClientRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(clients) => Json(clients).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list clients");
            db_error(&e)
        }
    }
}

/// GET /admin/clients/{id} - Fetch one client.
async fn get_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = ClientRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(client)) => Json(client).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Client not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to fetch client");
            db_error(&e)
        }
    }
}

/// POST /admin/clients - Create a client.
async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ClientPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }
    if payload.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "name required" })),
        )
            .into_response();
    }

    let repo = ClientRepository::new((*state.db).clone());
    match repo.create(payload.into()).await {
        Ok(client) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Create,
                    entity: "Client",
                    entity_id: Some(client.id),
                    before: None,
                    after: snapshot(&client),
                })
                .await;
            (StatusCode::CREATED, Json(client)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to create client");
            db_error(&e)
        }
    }
}

/// PUT /admin/clients/{id} - Update a client.
async fn update_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = ClientRepository::new((*state.db).clone());
    let before = match repo.find_by_id(id).await {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "failed to fetch client");
            return db_error(&e);
        }
    };

    match repo.update(id, payload.into()).await {
        Ok(Some(client)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Update,
                    entity: "Client",
                    entity_id: Some(client.id),
                    before: before.as_ref().and_then(snapshot),
                    after: snapshot(&client),
                })
                .await;
            Json(client).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Client not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to update client");
            db_error(&e)
        }
    }
}

/// DELETE /admin/clients/{id} - Delete a client and their shares.
async fn delete_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = ClientRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(Some(deleted)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Delete,
                    entity: "Client",
                    entity_id: Some(id),
                    before: snapshot(&deleted),
                    after: None,
                })
                .await;
            Json(json!({ "ok": true })).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Client not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to delete client");
            db_error(&e)
        }
    }
}

/// GET /admin/properties/{id}/co-owners - List a property's co-owners.
async fn list_co_owners(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = ClientRepository::new((*state.db).clone());
    match repo.list_co_owners(id).await {
        Ok(rows) => {
            let payload: Vec<Value> = rows
                .iter()
                .map(|(share, client)| {
                    let mut value = snapshot(share).unwrap_or_else(|| json!({}));
                    if let Value::Object(map) = &mut value {
                        map.insert(
                            "client".to_string(),
                            client.as_ref().and_then(snapshot).unwrap_or(Value::Null),
                        );
                    }
                    value
                })
                .collect();
            Json(payload).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list co-owners");
            db_error(&e)
        }
    }
}

/// POST /admin/properties/{id}/co-owners - Register a share.
async fn add_co_owner(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CoOwnerPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }
    if payload.share < Decimal::ZERO || payload.share > Decimal::ONE {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "share must be between 0 and 1" })),
        )
            .into_response();
    }

    let properties = PropertyRepository::new((*state.db).clone());
    match properties.find_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Property not found" })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "failed to fetch property");
            return db_error(&e);
        }
    }

    let repo = ClientRepository::new((*state.db).clone());
    match repo
        .add_co_owner(
            id,
            CoOwnershipInput {
                client_id: payload.client_id,
                share: payload.share,
            },
        )
        .await
    {
        Ok(share) => (StatusCode::CREATED, Json(share)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to register co-owner");
            db_error(&e)
        }
    }
}

/// DELETE /admin/co-owners/{id} - Remove a share.
async fn delete_co_owner(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = ClientRepository::new((*state.db).clone());
    match repo.delete_co_owner(id).await {
        Ok(Some(_)) => Json(json!({ "ok": true })).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Co-ownership not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to remove co-owner");
            db_error(&e)
        }
    }
}
