//! Audit trail routes, admin only.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_role;
use crate::routes::db_error;
use terralot_core::Role;
use terralot_db::repositories::AuditRecorder;

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 200;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<u64>,
    offset: Option<u64>,
}

/// Creates the admin audit log routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/audit-logs", get(list_logs))
}

/// GET /admin/audit-logs - Page through the audit trail, newest first.
async fn list_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let recorder = AuditRecorder::new((*state.db).clone());
    match recorder.list(limit, offset).await {
        Ok((logs, total)) => Json(json!({
            "logs": logs,
            "total": total,
            "limit": limit,
            "offset": offset,
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "failed to list audit logs");
            db_error(&e)
        }
    }
}
