//! Error types. Only I/O can fail; domain commands report no-ops as `Ok(false)`.

use std::path::PathBuf;

use thiserror::Error;

/// Key-value backend failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures surfaced by [`crate::engine::SessionStore`]
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("snapshot serialization error: {0}")]
    Snapshot(#[from] bincode::Error),
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Config file failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
