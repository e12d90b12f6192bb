//! Structured error types for addrspace
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::Pid;
use thiserror::Error;

/// Errors from building or rebuilding a map snapshot.
///
/// Lookup misses are deliberately not represented here: address resolution
/// is total and reports "not found" through `Option`, never through an
/// error.
#[derive(Error, Debug)]
pub enum MapsError {
    /// The mapping listing for the target process could not be read
    /// (process exited, permission denied). The store is left unchanged.
    #[error("failed to read memory maps for {pid}")]
    MapsUnreadable {
        pid: Pid,
        #[source]
        source: std::io::Error,
    },

    /// `rebuild()` was called on an uncached or static snapshot.
    #[error("snapshot for {0} is frozen and cannot be rebuilt")]
    FrozenSnapshot(Pid),
}

/// Errors from exporting or replaying snapshot JSON.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("invalid field in exported snapshot: {0}")]
    InvalidField(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
