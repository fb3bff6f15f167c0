pub mod document;
pub mod user;

pub use document::{DocumentFilter, DocumentPatch, DocumentRecord, FormatStatus, NewDocument};
pub use user::{NewUser, UserRecord};
