//! Error types for scripter-core

/// Result type for scripter-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a resolution run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A definition could not be loaded or was malformed
    #[error(transparent)]
    Meta(#[from] scripter_meta::Error),

    /// Filesystem error while reading engine configuration
    #[error(transparent)]
    Fs(#[from] scripter_fs::Error),

    /// The parent chain revisits a location
    #[error("Cyclic inheritance: {}", chain.join(" -> "))]
    CyclicInheritance { chain: Vec<String> },

    /// The parent chain is longer than the configured limit
    #[error("Ancestry exceeds {max_depth} definitions at {location}")]
    AncestryTooDeep { location: String, max_depth: usize },

    /// Engine configuration failed validation
    #[error("Invalid engine configuration: {message}")]
    InvalidConfig { message: String },

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
