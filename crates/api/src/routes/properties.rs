//! Property listing routes.
//!
//! Status values are normalized on write; unrecognized inputs are stored
//! as-is so nothing typed in the backoffice is ever lost. Reads
//! re-normalize and attach the French display label; values that map to
//! nothing pass through unlabeled.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
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
use terralot_core::{Role, normalize_property_status, property_status_label};
use terralot_db::PropertyRepository;
use terralot_db::entities::{properties, property_images};
use terralot_db::repositories::{
    AuditAction, AuditEntry, AuditRecorder, ImageInput, PropertyFilter, UpsertPropertyInput,
    audit::snapshot,
};

/// Query parameters for the property list.
#[derive(Debug, Deserialize)]
struct ListQuery {
    q: Option<String>,
    status: Option<String>,
    category: Option<String>,
}

/// Create/update payload for a property.
#[derive(Debug, Deserialize)]
struct PropertyPayload {
    slug: Option<String>,
    title: Option<String>,
    location: Option<String>,
    price: Option<Decimal>,
    status: Option<String>,
    category: Option<String>,
    description: Option<String>,
    area: Option<Decimal>,
    bedrooms: Option<i32>,
    bathrooms: Option<i32>,
    cover_image: Option<String>,
}

impl From<PropertyPayload> for UpsertPropertyInput {
    fn from(p: PropertyPayload) -> Self {
        Self {
            slug: p.slug,
            title: p.title,
            location: p.location,
            price: p.price,
            // Unrecognized status text is kept verbatim.
            status: p.status.map(|raw| {
                normalize_property_status(&raw)
                    .map_or(raw, |status| status.as_str().to_string())
            }),
            category: p.category,
            description: p.description,
            area: p.area,
            bedrooms: p.bedrooms,
            bathrooms: p.bathrooms,
            cover_image: p.cover_image,
        }
    }
}

/// Payload for attaching an image.
#[derive(Debug, Deserialize)]
struct ImagePayload {
    url: String,
    alt: Option<String>,
    #[serde(default)]
    sort_order: i32,
}

/// Serializes a property with its display label and images.
///
/// Stored rows may predate normalization or come from out-of-band
/// writes, so the status is re-normalized on every read; the raw value
/// is only presented when it maps to nothing.
fn property_json(property: &properties::Model, images: &[property_images::Model]) -> Value {
    let mut value = snapshot(property).unwrap_or_else(|| json!({}));
    if let Value::Object(map) = &mut value {
        let normalized = property
            .status
            .as_deref()
            .and_then(normalize_property_status);
        if let Some(status) = normalized {
            map.insert(
                "status".to_string(),
                Value::String(status.as_str().to_string()),
            );
        }
        let label = normalized
            .and_then(|status| property_status_label(status.as_str()))
            .map_or(Value::Null, |label| Value::String(label.to_string()));
        map.insert("status_label".to_string(), label);
        map.insert(
            "images".to_string(),
            snapshot(&images).unwrap_or_else(|| json!([])),
        );
    }
    value
}

/// Creates the public property routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/properties", get(list_properties))
        // {id} carries the slug on the detail route; one capture name
        // keeps the router happy.
        .route("/properties/{id}", get(get_property))
        .route("/properties/{id}/images", get(list_images))
}

/// Creates the admin property routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/properties", post(create_property))
        .route(
            "/properties/{id}",
            put(update_property).delete(delete_property),
        )
        .route("/properties/{id}/images", post(add_image))
        .route(
            "/properties/{id}/images/{image_id}",
            delete(delete_image),
        )
}

/// GET /properties - List properties with optional filters.
async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    // A status filter that normalizes to nothing filters nothing.
    let status = query
        .status
        .as_deref()
        .and_then(normalize_property_status)
        .map(|status| status.as_str().to_string());

    let filter = PropertyFilter {
        q: query.q,
        status,
        category: query.category,
    };

    let repo = PropertyRepository::new((*state.db).clone());
    match repo.list(&filter).await {
        Ok(rows) => {
            let payload: Vec<Value> = rows
                .iter()
                .map(|(property, images)| property_json(property, images))
                .collect();
            Json(payload).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list properties");
            db_error(&e)
        }
    }
}

/// GET /properties/{slug} - Fetch one property with its images.
async fn get_property(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let repo = PropertyRepository::new((*state.db).clone());
    match repo.find_by_slug(&slug).await {
        Ok(Some((property, images))) => Json(property_json(&property, &images)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Property not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to fetch property");
            db_error(&e)
        }
    }
}

/// POST /admin/properties - Create a property.
async fn create_property(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PropertyPayload>,
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

    let repo = PropertyRepository::new((*state.db).clone());
    match repo.create(payload.into()).await {
        Ok(property) => (StatusCode::CREATED, Json(property)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to create property");
            db_error(&e)
        }
    }
}

/// PUT /admin/properties/{id} - Update a property.
async fn update_property(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PropertyPayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = PropertyRepository::new((*state.db).clone());
    match repo.update(id, payload.into()).await {
        Ok(Some(property)) => Json(property).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Property not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to update property");
            db_error(&e)
        }
    }
}

/// DELETE /admin/properties/{id} - Delete a property and its images.
async fn delete_property(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin]) {
        return forbidden;
    }

    let repo = PropertyRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(Some(_)) => Json(json!({ "ok": true })).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Property not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to delete property");
            db_error(&e)
        }
    }
}

/// GET /properties/{id}/images - List a property's images.
async fn list_images(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = PropertyRepository::new((*state.db).clone());
    match repo.list_images(id).await {
        Ok(images) => Json(images).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list images");
            db_error(&e)
        }
    }
}

/// POST /admin/properties/{id}/images - Attach an image.
async fn add_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ImagePayload>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = PropertyRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
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

    match repo
        .add_image(
            id,
            ImageInput {
                url: payload.url,
                alt: payload.alt,
                sort_order: payload.sort_order,
            },
        )
        .await
    {
        Ok(image) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Create,
                    entity: "PropertyImage",
                    entity_id: Some(image.id),
                    before: None,
                    after: snapshot(&image),
                })
                .await;
            (StatusCode::CREATED, Json(image)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to add image");
            db_error(&e)
        }
    }
}

/// DELETE /admin/properties/{id}/images/{image_id} - Remove an image.
async fn delete_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((_, image_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(auth.claims(), &[Role::Admin, Role::Sales]) {
        return forbidden;
    }

    let repo = PropertyRepository::new((*state.db).clone());
    match repo.delete_image(image_id).await {
        Ok(Some(deleted)) => {
            AuditRecorder::new((*state.db).clone())
                .record(AuditEntry {
                    user_id: Some(auth.user_id()),
                    action: AuditAction::Delete,
                    entity: "PropertyImage",
                    entity_id: Some(image_id),
                    before: snapshot(&deleted),
                    after: None,
                })
                .await;
            Json(json!({ "ok": true })).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Image not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to delete image");
            db_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn listing(status: Option<&str>) -> properties::Model {
        properties::Model {
            id: Uuid::new_v4(),
            slug: "lot-12".to_string(),
            title: "Terrain Akanda".to_string(),
            location: None,
            price: None,
            status: status.map(ToString::to_string),
            category: None,
            description: None,
            area: None,
            bedrooms: None,
            bathrooms: None,
            cover_image: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn read_normalizes_legacy_french_status() {
        let value = property_json(&listing(Some("à vendre")), &[]);
        assert_eq!(value["status"], "sale");
        assert_eq!(value["status_label"], "À vendre");
    }

    #[test]
    fn read_labels_stored_code() {
        let value = property_json(&listing(Some("rent")), &[]);
        assert_eq!(value["status"], "rent");
        assert_eq!(value["status_label"], "À louer");
    }

    #[test]
    fn unrecognized_status_passes_through_unlabeled() {
        let value = property_json(&listing(Some("bail emphytéotique")), &[]);
        assert_eq!(value["status"], "bail emphytéotique");
        assert_eq!(value["status_label"], serde_json::Value::Null);
    }
}
