use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("id prefix `{prefix}` matches {count} books")]
    AmbiguousId { prefix: String, count: usize },

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("rating must be between 0 and {max}, got {value}")]
    InvalidRating { value: i64, max: u8 },

    #[error("book {0} has not been read yet")]
    NotRead(String),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
