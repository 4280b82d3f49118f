use crate::model::FailureKind;
use lineage_scanner::{Identifier, ScanError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    /// The starting record could not be fetched or read. Nothing is written.
    #[error("Root record {id} unavailable ({}): {message}", .kind.as_str())]
    RootUnavailable {
        id: Identifier,
        kind: FailureKind,
        message: String,
    },

    #[error("Trace of {0} cancelled before any record was retrieved")]
    Cancelled(Identifier),

    #[error("Scanner setup failed: {0}")]
    Scanner(#[from] ScanError),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Identifier {0} collides with a reserved document key")]
    ReservedKey(Identifier),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TraceError>;
