use thiserror::Error;

/// All the ways things can go wrong in iemono
///
/// The expiry engine itself is total, so almost everything here comes from
/// the edges: form input, the store, and the config file.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Store operation failed: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
