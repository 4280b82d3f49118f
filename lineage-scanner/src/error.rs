use crate::record::Identifier;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Record {0} not found")]
    NotFound(Identifier),

    #[error("Unexpected HTTP status {status} for record {id}")]
    HttpStatus { id: Identifier, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Extraction error: {0}")]
    ExtractionError(String),
}

impl ScanError {
    /// True when the record itself does not exist, as opposed to the
    /// request failing on the way there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScanError::NotFound(_))
    }

    pub fn is_extraction(&self) -> bool {
        matches!(self, ScanError::ExtractionError(_))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
