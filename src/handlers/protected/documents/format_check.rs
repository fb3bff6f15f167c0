// handlers/protected/documents/format_check.rs - POST /documents/:document_id/format-check

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{DocumentPatch, FormatStatus};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::utils::{document_not_found, ensure_owner, fetch_document, parse_document_id};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatCheckResponse {
    pub document_id: Uuid,
    pub format_status: FormatStatus,
    pub issues: Option<Vec<String>>,
}

/// POST /documents/:document_id/format-check
///
/// Runs the configured format checker and stores the resulting status on the
/// document. Storing the status mutates the document, so only its owner may
/// run the check. The default checker is a coin flip.
pub async fn format_check_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(document_id): Path<String>,
) -> ApiResult<FormatCheckResponse> {
    let document_id = parse_document_id(&document_id)?;
    let document = fetch_document(&state, document_id).await?;
    ensure_owner(&user, &document, "check")?;

    let outcome = state.format_checker.check(&document);

    // Deleted between the fetch and the write
    state
        .documents
        .update(document_id, &DocumentPatch::format_status(outcome.status))
        .await?
        .ok_or_else(document_not_found)?;

    tracing::info!(
        user_id = %user.user_id,
        document_id = %document_id,
        status = ?outcome.status,
        "format check completed"
    );

    Ok(ApiResponse::success(FormatCheckResponse {
        document_id,
        format_status: outcome.status,
        issues: outcome.issues,
    }))
}
