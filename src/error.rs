use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid {field} rating {value}: must be between 1 and 5")]
    InvalidRating { field: &'static str, value: u8 },

    #[error("Invalid top-N value {0}: must be a positive integer")]
    InvalidTopN(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input directory not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to load document {source_id}: {message}")]
    Document { source_id: String, message: String },

    #[error("No markdown documents found in {0}")]
    NoDocuments(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Failures confined to a single document, which a skip-errors run may step over.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Error::Document { .. })
    }
}
