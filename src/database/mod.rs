pub mod error;
pub mod filter;
pub mod memory;
pub mod models;
pub mod repository;
pub mod supabase;

pub use error::StoreError;
pub use filter::{Filter, FilterError};
pub use memory::MemoryStore;
pub use repository::{DocumentRepository, UserRepository};
pub use supabase::{SupabaseClient, SupabaseStore};
