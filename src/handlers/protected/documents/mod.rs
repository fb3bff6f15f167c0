// handlers/protected/documents/mod.rs - Document management
//
// Reads are open to any authenticated identity. PUT and DELETE go through the
// ownership gate in `utils::ensure_owner` after the record is fetched.

pub mod collection;   // POST /documents/, GET /documents/
pub mod format_check; // POST /documents/:document_id/format-check
pub mod record;       // GET, PUT, DELETE /documents/:id
pub mod utils;

pub use collection::{create_post, list_get, DocumentCreate};
pub use format_check::{format_check_post, FormatCheckResponse};
pub use record::{record_delete, record_get, record_put, DocumentUpdate};
