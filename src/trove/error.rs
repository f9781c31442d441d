use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TroveError {
    #[error("Shift by {delta} out of range: {available} segment(s) available")]
    OutOfRangeShift { delta: i64, available: usize },

    #[error("Resource {0} was modified concurrently; re-fetch and retry")]
    ConcurrentModification(Uuid),

    #[error("Partial move: {} file(s) copied, {} failed", .moved.len(), .failed.len())]
    PartialMove {
        /// (source, destination) pairs that copied and verified.
        moved: Vec<(PathBuf, PathBuf)>,
        /// (source, reason) pairs that did not.
        failed: Vec<(PathBuf, std::io::Error)>,
    },

    #[error("Datum not found: {0}")]
    UnknownDatum(Uuid),

    #[error("Resource not found: {0}")]
    UnknownResource(Uuid),

    #[error("No handler registered for spec '{0}'")]
    UnregisteredSpec(String),

    #[error("Handler failed to decode datum: {0}")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, TroveError>;
