//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Why a store operation failed.
#[derive(Error, Debug)]
pub enum KvError {
    /// The data directory could not be created.
    #[error("cannot open store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or replacing the store file failed.
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store file or a typed value is not valid JSON for its type.
    #[error("store contents are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The backend cannot serve requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type KvResult<T> = Result<T, KvError>;
