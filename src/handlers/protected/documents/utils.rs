use uuid::Uuid;

use crate::database::models::DocumentRecord;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Parse a path id. Ids that are not UUIDs cannot name a document.
pub fn parse_document_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| document_not_found())
}

/// Fetch a document or fail with 404.
pub async fn fetch_document(state: &AppState, id: Uuid) -> Result<DocumentRecord, ApiError> {
    state
        .documents
        .get(id)
        .await?
        .ok_or_else(document_not_found)
}

/// Ownership gate: only the creating identity may mutate or delete a document.
///
/// Mismatch is a 403, so the document's existence is visible to other users.
pub fn ensure_owner(user: &AuthUser, document: &DocumentRecord, action: &str) -> Result<(), ApiError> {
    if document.user_id == user.user_id {
        return Ok(());
    }
    tracing::warn!(
        user_id = %user.user_id,
        document_id = %document.id,
        "refused to {} a document owned by another user",
        action
    );
    Err(ApiError::forbidden(format!("Not authorized to {} this document", action)))
}

pub fn document_not_found() -> ApiError {
    ApiError::not_found("Document not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::FormatStatus;
    use chrono::Utc;

    fn document_owned_by(user_id: Uuid) -> DocumentRecord {
        DocumentRecord {
            id: Uuid::new_v4(),
            user_id,
            title: "Opening speech".to_string(),
            doc_type: "speech".to_string(),
            committee: "GA1".to_string(),
            country: "Brazil".to_string(),
            topic: "Disarmament".to_string(),
            content: None,
            format_status: FormatStatus::NotChecked,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_owner_passes_gate() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            expires_at: 0,
        };
        assert!(ensure_owner(&user, &document_owned_by(user.user_id), "update").is_ok());
    }

    #[test]
    fn test_other_user_is_forbidden() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            expires_at: 0,
        };
        let err = ensure_owner(&user, &document_owned_by(Uuid::new_v4()), "delete").unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(ref msg) if msg == "Not authorized to delete this document"));
    }

    #[test]
    fn test_non_uuid_id_is_not_found() {
        assert!(matches!(parse_document_id("42"), Err(ApiError::NotFound(_))));
        assert!(parse_document_id(&Uuid::new_v4().to_string()).is_ok());
    }
}
