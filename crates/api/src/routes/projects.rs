//! Development project routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::require_role;
use crate::routes::db_error;
use terralot_core::{Role, normalize_project_phase};
use terralot_db::ProjectRepository;
use terralot_db::entities::{project_media, projects};
use terralot_db::repositories::{
    AuditAction, AuditEntry, AuditRecorder, MediaInput, ProjectFilter, UpsertProjectInput,
    audit::snapshot,
};

/// Query parameters for the project list.
#[derive(Debug, Deserialize)]
struct ListQuery {
    q: Option<String>,
    status: Option<String>,
    category: Option<String>,
}

/// Create/update payload for a project.
#[derive(Debug, Deserialize)]
struct ProjectPayload {
    slug: Option<String>,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    category: Option<String>,
    location: Option<String>,
    surface: Option<Decimal>,
    units: Option<i32>,
    cover_image: Option<String>,
    started_at: Option<DateTime<FixedOffset>>,
    delivered_at: Option<DateTime<FixedOffset>>,
}

impl From<ProjectPayload> for UpsertProjectInput {
    fn from(p: ProjectPayload) -> Self {
        Self {
            slug: p.slug,
            title: p.title,
            description: p.description,
            // Unrecognized phase text is kept verbatim.
            status: p.status.map(|raw| {
                normalize_project_phase(&raw).map_or(raw, |phase| phase.as_str().to_string())
            }),
            category: p.category,
            location: p.location,
            surface: p.surface,
            units: p.units,
            cover_image: p.cover_image,
            started_at: p.started_at,
            delivered_at: p.delivered_at,
        }
    }
}

/// Payload for attaching a media item.
#[derive(Debug, Deserialize)]
struct MediaPayload {
    #[serde(default = "default_kind")]
    kind: String,
    url: String,
    alt: Option<String>,
    #[serde(default)]
    sort_order: i32,
}

fn default_kind() -> String {
    "image".to_string()
}

/// Serializes a project with its media gallery.
///
/// The stored phase is re-normalized on every read so legacy rows
/// render as codes; unrecognized values pass through as stored.
fn project_json(project: &projects::Model, media: &[project_media::Model]) -> Value {
    let mut value = snapshot(project).unwrap_or_else(|| json!({}));
    if let Value::Object(map) = &mut value {
        if let Some(phase) = project.status.as_deref().and_then(normalize_project_phase) {
            map.insert(
                "status".to_string(),
                Value::String(phase.as_str().to_string()),
            );
        }
        map.insert(
            "media".to_string(),
            snapshot(&media).unwrap_or_else(|| json!([])),
        );
    }
    value
}

/// Creates the public project routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects))
        // {id} carries the slug on the detail route; one capture name
        // keeps the router happy.
        .route("/projects/{id}", get(get_project))
        .route("/projects/{id}/media", get(list_media))
}

/// Creates the admin project routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects/{id}", put(update_project).delete(delete_project))
        .route("/projects/{id}/media", post(add_media))
        .route("/projects/{id}/media/{media_id}", delete(delete_media))
}

/// GET /projects - List projects with optional filters.
async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let status = query
        .status
        .as_deref()
        .and_then(normalize_project_phase)
        .map(|phase| phase.as_str().to_string());

    let filter = ProjectFilter {
        q: query.q,
        status,
        category: query.category,
    };

    let repo = ProjectRepository::new((*state.db).clone());
    match repo.list(&filter).await {
        Ok(rows) => {
            let payload: Vec<Value> = rows
                .iter()
                .map(|(project, media)| project_json(project, media))
                .collect();
            Json(payload).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list projects");
            db_error(&e)
        }
    }
}

/// GET /projects/{slug} - Fetch one project with its media.
async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let repo = ProjectRepository::new((*state.db).clone());
    match repo.find_by_slug(&slug).await {
        Ok(Some((project, media))) => Json(project_json(&project, &media)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Project not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to fetch project");
            db_error(&e)
        }
    }
}

/// POST /admin/projects - Create a project.
async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ProjectPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }
    if payload.slug.is_none() || payload.title.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "slug and title required" })),
        )
            .into_response();
    }

    let repo = ProjectRepository::new((*state.db).clone());
    match repo.create(payload.into()).await {
        Ok(project) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Create,
                    entity: "Project",
                    entity_id: Some(project.id),
                    before: None,
                    after: snapshot(&project),
                })
                .await;
            (StatusCode::CREATED, Json(project)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to create project");
            db_error(&e)
        }
    }
}

/// PUT /admin/projects/{id} - Update a project.
async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = ProjectRepository::new((*state.db).clone());
    let before = match repo.find_by_id(id).await {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "failed to fetch project");
            return db_error(&e);
        }
    };

    match repo.update(id, payload.into()).await {
        Ok(Some(project)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Update,
                    entity: "Project",
                    entity_id: Some(project.id),
                    before: before.as_ref().and_then(snapshot),
                    after: snapshot(&project),
                })
                .await;
            Json(project).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Project not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to update project");
            db_error(&e)
        }
    }
}

/// DELETE /admin/projects/{id} - Delete a project and its media.
async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = ProjectRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(Some(deleted)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Delete,
                    entity: "Project",
                    entity_id: Some(id),
                    before: snapshot(&deleted),
                    after: None,
                })
                .await;
            Json(json!({ "ok": true })).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Project not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to delete project");
            db_error(&e)
        }
    }
}

/// GET /projects/{id}/media - List a project's media.
async fn list_media(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ProjectRepository::new((*state.db).clone());
    match repo.list_media(id).await {
        Ok(media) => Json(media).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list media");
            db_error(&e)
        }
    }
}

/// POST /admin/projects/{id}/media - Attach a media item.
async fn add_media(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MediaPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = ProjectRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Project not found" })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "failed to fetch project");
            return db_error(&e);
        }
    }

    match repo
        .add_media(
            id,
            MediaInput {
                kind: payload.kind,
                url: payload.url,
                alt: payload.alt,
                sort_order: payload.sort_order,
            },
        )
        .await
    {
        Ok(media) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Create,
                    entity: "ProjectMedia",
                    entity_id: Some(media.id),
                    before: None,
                    after: snapshot(&media),
                })
                .await;
            (StatusCode::CREATED, Json(media)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to add media");
            db_error(&e)
        }
    }
}

/// DELETE /admin/projects/{id}/media/{media_id} - Remove a media item.
async fn delete_media(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((_, media_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = ProjectRepository::new((*state.db).clone());
    match repo.delete_media(media_id).await {
        Ok(Some(deleted)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Delete,
                    entity: "ProjectMedia",
                    entity_id: Some(media_id),
                    before: snapshot(&deleted),
                    after: None,
                })
                .await;
            Json(json!({ "ok": true })).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Media not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to delete media");
            db_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn development(status: Option<&str>) -> projects::Model {
        projects::Model {
            id: Uuid::new_v4(),
            slug: "les-palmiers".to_string(),
            title: "Résidence Les Palmiers".to_string(),
            description: None,
            status: status.map(ToString::to_string),
            category: None,
            location: None,
            surface: None,
            units: None,
            cover_image: None,
            started_at: None,
            delivered_at: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn read_normalizes_legacy_french_phase() {
        let value = project_json(&development(Some("en cours")), &[]);
        assert_eq!(value["status"], "ongoing");
    }

    #[test]
    fn unrecognized_phase_passes_through() {
        let value = project_json(&development(Some("phase pilote")), &[]);
        assert_eq!(value["status"], "phase pilote");
    }
}
