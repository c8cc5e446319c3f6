//! Backoffice user management routes, admin only.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
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
use terralot_core::auth::hash_password;
use terralot_db::UserRepository;
use terralot_db::repositories::{
    AuditAction, AuditEntry, AuditRecorder, UpdateUserInput, audit::snapshot,
};

/// Payload for creating a user.
#[derive(Debug, Deserialize)]
struct CreateUserPayload {
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
    role: Option<String>,
    #[serde(default)]
    is_staff: bool,
}

/// Payload for updating a user.
#[derive(Debug, Deserialize)]
struct UpdateUserPayload {
    email: Option<String>,
    name: Option<String>,
    role: Option<String>,
    is_staff: Option<bool>,
    password: Option<String>,
}

/// Creates the admin user routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", put(update_user).delete(delete_user))
}

/// GET /admin/users - List backoffice users.
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(users) => Json(users).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list users");
            db_error(&e)
        }
    }
}

/// POST /admin/users - Create a backoffice user.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email and password required" })),
        )
            .into_response();
    };

    let repo = UserRepository::new((*state.db).clone());
    match repo.email_exists(&email).await {
        Ok(true) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Email already exists" })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "failed to check email");
            return db_error(&e);
        }
    }

    let password_hash = match hash_password(&password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "password hashing error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "User creation failed" })),
            )
                .into_response();
        }
    };

    match repo
        .create(
            &email,
            &password_hash,
            payload.name.as_deref(),
            payload.role.as_deref(),
            payload.is_staff,
        )
        .await
    {
        Ok(user) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Create,
                    entity: "User",
                    entity_id: Some(user.id),
                    before: None,
                    after: snapshot(&user),
                })
                .await;
            (StatusCode::CREATED, Json(user)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to create user");
            db_error(&e)
        }
    }
}

/// PUT /admin/users/{id} - Update a backoffice user.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let password_hash = match payload.password {
        Some(password) => match hash_password(&password) {
            Ok(h) => Some(h),
            Err(e) => {
                error!(error = %e, "password hashing error");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "User update failed" })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let repo = UserRepository::new((*state.db).clone());
    let before = match repo.find_by_id(id).await {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "failed to fetch user");
            return db_error(&e);
        }
    };

    let input = UpdateUserInput {
        email: payload.email,
        name: payload.name.map(Some),
        role: payload.role,
        is_staff: payload.is_staff,
        password_hash,
    };

    match repo.update(id, input).await {
        Ok(Some(user)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Update,
                    entity: "User",
                    entity_id: Some(user.id),
                    before: before.as_ref().and_then(snapshot),
                    after: snapshot(&user),
                })
                .await;
            Json(user).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to update user");
            db_error(&e)
        }
    }
}

/// DELETE /admin/users/{id} - Delete a backoffice user.
///
/// Deleting one's own account is rejected.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }
    if id == auth.user_id() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Cannot delete your own account" })),
        )
            .into_response();
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(Some(deleted)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Delete,
                    entity: "User",
                    entity_id: Some(id),
                    before: snapshot(&deleted),
                    after: None,
                })
                .await;
            Json(json!({ "ok": true })).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to delete user");
            db_error(&e)
        }
    }
}
