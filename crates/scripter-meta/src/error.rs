//! Error types for scripter-meta

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] scripter_fs::Error),

    #[error("Definition not found at {location}")]
    DefinitionNotFound { location: String },

    #[error("Invalid definition at {location}: {message}")]
    InvalidDefinition { location: String, message: String },
}
