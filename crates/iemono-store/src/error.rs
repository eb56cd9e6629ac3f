use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for iemono_core::Error {
    fn from(err: StoreError) -> Self {
        iemono_core::Error::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
