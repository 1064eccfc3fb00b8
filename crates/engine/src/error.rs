//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidDate`] thrown when a legacy calendar string can't be resolved.
//! - [`EntryNotFound`] thrown when an entry id is not in the collection.
//! - [`CorruptStore`] thrown when the backing store holds unexpected data.
//!
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`EntryNotFound`]: EngineError::EntryNotFound
//!  [`CorruptStore`]: EngineError::CorruptStore
use thiserror::Error;
use uuid::Uuid;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("\"{0}\" entry not found!")]
    EntryNotFound(Uuid),
    #[error("Corrupt store: {0}")]
    CorruptStore(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::EntryNotFound(a), Self::EntryNotFound(b)) => a == b,
            (Self::CorruptStore(a), Self::CorruptStore(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
