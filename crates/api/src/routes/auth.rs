//! Authentication routes for login and register.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::routes::db_error;
use terralot_core::auth::{hash_password, verify_password};
use terralot_db::UserRepository;
use terralot_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, UserSummary};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// POST /auth/login - Authenticate a user and return a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if payload.email.is_empty() || payload.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email and password required" })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "login attempt for unknown email");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "database error during login");
            return db_error(&e);
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "failed login attempt");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "password verification error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Login failed" })),
            )
                .into_response();
        }
    }

    let token = match state.jwt_service.sign_token(
        user.id,
        &user.email,
        user.is_staff,
        user.role.as_deref(),
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "failed to sign token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Login failed" })),
            )
                .into_response();
        }
    };

    Json(LoginResponse {
        token,
        user: UserSummary {
            id: user.id,
            email: user.email,
            name: user.name,
            is_staff: user.is_staff,
        },
    })
    .into_response()
}

/// POST /auth/register - Create an account and return a bearer token.
///
/// Registered accounts start without a role and without the staff flag;
/// an admin grants access from the users screen.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if payload.email.is_empty() || payload.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email and password required" })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Email already exists" })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "database error during register");
            return db_error(&e);
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "password hashing error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Registration failed" })),
            )
                .into_response();
        }
    };

    let user = match user_repo
        .create(
            &payload.email,
            &password_hash,
            payload.name.as_deref(),
            None,
            false,
        )
        .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "failed to create user");
            return db_error(&e);
        }
    };

    let token = match state.jwt_service.sign_token(
        user.id,
        &user.email,
        user.is_staff,
        user.role.as_deref(),
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "failed to sign token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Registration failed" })),
            )
                .into_response();
        }
    };

    info!(user_id = %user.id, "user registered");
    (
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            user: UserSummary {
                id: user.id,
                email: user.email,
                name: user.name,
                is_staff: user.is_staff,
            },
        }),
    )
        .into_response()
}
