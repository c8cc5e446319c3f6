//! File upload routes.
//!
//! Every upload lands in the local upload directory, which is served
//! under `/uploads`. Admin uploads are additionally forwarded to the
//! configured S3 target when one exists; on forward failure the local
//! URL is returned and the error is logged.

use std::path::Path as FsPath;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_role;
use terralot_core::Role;

/// Creates the public upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_public))
}

/// Creates the admin upload routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_admin))
}

/// Builds a collision-free stored name keeping the original extension.
fn stored_name(original: Option<&str>) -> String {
    let ext = original
        .and_then(|name| FsPath::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(char::is_alphanumeric));
    match ext {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_lowercase()),
        None => Uuid::new_v4().to_string(),
    }
}

/// Reads the first file field out of a multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "No file provided" })),
                )
                    .into_response());
            }
            Err(e) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid multipart body", "details": e.to_string() })),
                )
                    .into_response());
            }
        };

        if field.file_name().is_none() {
            continue;
        }
        let name = stored_name(field.file_name());
        match field.bytes().await {
            Ok(bytes) => return Ok((name, bytes.to_vec())),
            Err(e) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Upload read failed", "details": e.to_string() })),
                )
                    .into_response());
            }
        }
    }
}

/// Writes the file into the local upload directory.
async fn store_local(state: &AppState, name: &str, bytes: &[u8]) -> Result<String, Response> {
    let dir = &state.config.upload.dir;
    let path = FsPath::new(dir).join(name);
    if let Err(e) = tokio::fs::write(&path, bytes).await {
        error!(error = %e, path = %path.display(), "failed to write upload");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Upload failed" })),
        )
            .into_response());
    }
    Ok(format!("/uploads/{name}"))
}

/// POST /upload - Store a file locally and return its public URL.
async fn upload_public(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let (name, bytes) = match read_file_field(&mut multipart).await {
        Ok(file) => file,
        Err(response) => return response,
    };

    match store_local(&state, &name, &bytes).await {
        Ok(url) => (StatusCode::CREATED, Json(json!({ "url": url }))).into_response(),
        Err(response) => response,
    }
}

/// POST /admin/upload - Store a file locally and forward it to S3.
async fn upload_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let (name, bytes) = match read_file_field(&mut multipart).await {
        Ok(file) => file,
        Err(response) => return response,
    };

    let local_url = match store_local(&state, &name, &bytes).await {
        Ok(url) => url,
        Err(response) => return response,
    };

    // The local copy is the durable fallback; a failed forward is not an
    // upload failure.
    let url = match &state.storage {
        Some(storage) => match storage.store(&name, bytes).await {
            Ok(remote_url) => remote_url,
            Err(e) => {
                warn!(error = %e, "S3 forward failed, serving local copy");
                local_url
            }
        },
        None => local_url,
    };

    (StatusCode::CREATED, Json(json!({ "url": url }))).into_response()
}
