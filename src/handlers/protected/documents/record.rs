// handlers/protected/documents/record.rs - GET/PUT/DELETE /documents/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::database::models::{DocumentPatch, DocumentRecord, FormatStatus};
use crate::database::StoreError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::utils::{ensure_owner, fetch_document, parse_document_id};

/// Body of PUT /documents/:id. Absent or null fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub committee: Option<String>,
    pub country: Option<String>,
    pub topic: Option<String>,
    pub content: Option<String>,
    pub format_status: Option<FormatStatus>,
}

impl From<DocumentUpdate> for DocumentPatch {
    fn from(update: DocumentUpdate) -> Self {
        Self {
            title: update.title,
            doc_type: update.doc_type,
            committee: update.committee,
            country: update.country,
            topic: update.topic,
            content: update.content,
            format_status: update.format_status,
            updated_at: None,
        }
    }
}

/// GET /documents/:id
pub async fn record_get(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<DocumentRecord> {
    let id = parse_document_id(&id)?;
    let document = fetch_document(&state, id).await?;
    Ok(ApiResponse::success(document))
}

/// PUT /documents/:id - Owner-only partial update
pub async fn record_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<DocumentUpdate>, JsonRejection>,
) -> ApiResult<DocumentRecord> {
    let Json(payload) = payload?;
    let id = parse_document_id(&id)?;
    let existing = fetch_document(&state, id).await?;
    ensure_owner(&user, &existing, "update")?;

    let mut patch = DocumentPatch::from(payload);
    if patch.is_empty() {
        return Ok(ApiResponse::success(existing));
    }
    patch.updated_at = Some(Utc::now());

    let updated = state
        .documents
        .update(id, &patch)
        .await?
        .ok_or(StoreError::EmptyResult("update document"))?;

    tracing::info!(user_id = %user.user_id, document_id = %id, "updated document");
    Ok(ApiResponse::success(updated))
}

/// DELETE /documents/:id - Owner-only delete, 204 on success
pub async fn record_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_document_id(&id)?;
    let existing = fetch_document(&state, id).await?;
    ensure_owner(&user, &existing, "delete")?;

    state.documents.delete(id).await?;
    tracing::info!(user_id = %user.user_id, document_id = %id, "deleted document");

    Ok(ApiResponse::no_content())
}
