// handlers/protected/documents/collection.rs - POST/GET /documents/

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{DocumentFilter, DocumentRecord, FormatStatus, NewDocument};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// Body of POST /documents/. `type` is one of position_paper, resolution,
/// speech, research by convention; it is stored as given.
#[derive(Debug, Deserialize)]
pub struct DocumentCreate {
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub committee: String,
    pub country: String,
    pub topic: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// POST /documents/ - Create a document owned by the caller
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<DocumentCreate>, JsonRejection>,
) -> ApiResult<DocumentRecord> {
    let Json(payload) = payload?;
    let new_document = NewDocument {
        user_id: user.user_id,
        title: payload.title,
        doc_type: payload.doc_type,
        committee: payload.committee,
        country: payload.country,
        topic: payload.topic,
        content: payload.content,
        format_status: FormatStatus::NotChecked,
    };

    let document = state.documents.insert(new_document).await?;
    tracing::info!(user_id = %user.user_id, document_id = %document.id, "created document");

    Ok(ApiResponse::created(document))
}

/// GET /documents/ - List documents, optionally filtered by type, committee, country
pub async fn list_get(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    Query(filter): Query<DocumentFilter>,
) -> ApiResult<Vec<DocumentRecord>> {
    let documents = state.documents.list(&filter).await?;
    Ok(ApiResponse::success(documents))
}
