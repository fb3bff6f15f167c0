use thiserror::Error;

use super::filter::FilterError;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database service unavailable: {0}")]
    Unavailable(String),

    #[error("Database service returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Could not decode database response: {0}")]
    Decode(String),

    /// A write that should have returned the affected row returned nothing.
    #[error("Database returned no data for {0}")]
    EmptyResult(&'static str),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            StoreError::Remote {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}
