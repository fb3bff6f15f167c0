use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreError;
use super::models::{DocumentFilter, DocumentPatch, DocumentRecord, NewDocument, NewUser, UserRecord};

/// Identity storage. Identities are created once and only read afterwards.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact, case-sensitive email lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError>;
}

/// Document storage. Ownership is enforced by callers, not here.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn insert(&self, document: NewDocument) -> Result<DocumentRecord, StoreError>;

    async fn list(&self, filter: &DocumentFilter) -> Result<Vec<DocumentRecord>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>, StoreError>;

    /// Returns `None` when no row matched `id`.
    async fn update(&self, id: Uuid, patch: &DocumentPatch) -> Result<Option<DocumentRecord>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
