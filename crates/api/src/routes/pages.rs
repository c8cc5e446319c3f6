//! CMS page content routes.
//!
//! Blocks are keyed by (page, section, key) and exposed grouped by
//! section, the shape the storefront consumes directly. Both read and
//! upsert are public: the storefront editor posts straight to this
//! endpoint.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use tracing::error;

use crate::AppState;
use crate::routes::db_error;
use terralot_db::ContentRepository;
use terralot_db::entities::page_content;

/// Section -> key -> value.
type PagePayload = BTreeMap<String, BTreeMap<String, Option<String>>>;

fn group_blocks(blocks: &[page_content::Model]) -> Value {
    let mut grouped: BTreeMap<String, BTreeMap<String, Option<String>>> = BTreeMap::new();
    for block in blocks {
        grouped
            .entry(block.section.clone())
            .or_default()
            .insert(block.key.clone(), block.value.clone());
    }
    json!(grouped)
}

/// Creates the page content routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/page/{page}", get(get_page).post(update_page))
}

/// GET /page/{page} - Fetch a page's blocks grouped by section.
async fn get_page(State(state): State<AppState>, Path(page): Path<String>) -> impl IntoResponse {
    let repo = ContentRepository::new((*state.db).clone());
    match repo.list_for_page(&page).await {
        Ok(blocks) => Json(group_blocks(&blocks)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to fetch page content");
            db_error(&e)
        }
    }
}

/// POST /page/{page} - Upsert a page's blocks.
///
/// The payload is a section -> key -> value map; listed blocks are
/// created or overwritten, blocks absent from the payload are left
/// untouched.
async fn update_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
    Json(payload): Json<PagePayload>,
) -> impl IntoResponse {
    let repo = ContentRepository::new((*state.db).clone());
    for (section, entries) in &payload {
        for (key, value) in entries {
            if let Err(e) = repo.upsert_block(&page, section, key, value.clone()).await {
                error!(error = %e, section, key, "failed to upsert page block");
                return db_error(&e);
            }
        }
    }

    match repo.list_for_page(&page).await {
        Ok(blocks) => Json(group_blocks(&blocks)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to fetch page content");
            db_error(&e)
        }
    }
}
