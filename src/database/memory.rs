use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::StoreError;
use super::filter::Filter;
use super::models::{DocumentFilter, DocumentPatch, DocumentRecord, NewDocument, NewUser, UserRecord};
use super::repository::{DocumentRepository, UserRepository};

/// Process-local store with the same contract as the Supabase tables.
///
/// Used for local development (`STORAGE_BACKEND=memory`) and tests. Data does
/// not survive a restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, UserRecord>>>,
    documents: Arc<RwLock<HashMap<Uuid, DocumentRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        // Same guarantee as the unique index on users.email
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Remote {
                status: 409,
                message: "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
            });
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn insert(&self, document: NewDocument) -> Result<DocumentRecord, StoreError> {
        let record = DocumentRecord {
            id: Uuid::new_v4(),
            user_id: document.user_id,
            title: document.title,
            doc_type: document.doc_type,
            committee: document.committee,
            country: document.country,
            topic: document.topic,
            content: document.content,
            format_status: document.format_status,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.documents.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self, filter: &DocumentFilter) -> Result<Vec<DocumentRecord>, StoreError> {
        let filter = Filter::try_from(filter)?;
        let documents = self.documents.read().await;

        let mut matched = Vec::new();
        for record in documents.values() {
            let row = serde_json::to_value(record).map_err(|e| StoreError::Decode(e.to_string()))?;
            if filter.matches(&row) {
                matched.push(record.clone());
            }
        }
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>, StoreError> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, patch: &DocumentPatch) -> Result<Option<DocumentRecord>, StoreError> {
        let mut documents = self.documents.write().await;
        Ok(documents.get_mut(&id).map(|record| {
            patch.apply_to(record);
            record.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.documents.write().await.remove(&id);
        Ok(())
    }
}
