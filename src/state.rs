use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenAuthority};
use crate::config::{AppConfig, StorageBackend};
use crate::database::{DocumentRepository, MemoryStore, SupabaseClient, SupabaseStore, UserRepository};
use crate::services::{FormatChecker, RandomFormatChecker};

/// Process-wide state, built once at startup and cloned into every handler.
///
/// Nothing in here is mutated after construction.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenAuthority>,
    pub passwords: PasswordHasher,
    pub users: Arc<dyn UserRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub format_checker: Arc<dyn FormatChecker>,
    pub supabase: Option<SupabaseClient>,
}

impl AppState {
    /// Wire the production state for `config`.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let tokens = TokenAuthority::from_config(&config.security)?;

        let users: Arc<dyn UserRepository>;
        let documents: Arc<dyn DocumentRepository>;
        let supabase = match config.database.backend {
            StorageBackend::Supabase => {
                let client = SupabaseClient::from_config(&config.database)?;
                let store = Arc::new(SupabaseStore::new(client.clone()));
                users = store.clone();
                documents = store;
                Some(client)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                let store = Arc::new(MemoryStore::new());
                users = store.clone();
                documents = store;
                None
            }
        };

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            passwords: PasswordHasher::new(),
            users,
            documents,
            format_checker: Arc::new(RandomFormatChecker),
            supabase,
        })
    }

    /// Replace the format-check decision function.
    pub fn with_format_checker(mut self, checker: Arc<dyn FormatChecker>) -> Self {
        self.format_checker = checker;
        self
    }
}
