//! Error types for catalog operations

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::EntityId;

/// Errors raised by the JSON-Lines stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read store {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The filesystem rejected an append. The in-memory collection already
    /// holds the value, but it may not survive a restart.
    #[error("Failed to write to store {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize {kind} record: {source}")]
    Serialize {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// True when the value was kept in memory but never reached the disk
    pub fn is_write_failure(&self) -> bool {
        matches!(self, StoreError::Write { .. } | StoreError::Serialize { .. })
    }
}

/// Errors raised while decorating a new catalog item
#[derive(Error, Debug)]
pub enum DecorateError {
    #[error("No {kind} with id {id}")]
    UnknownReference { kind: &'static str, id: EntityId },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The interaction layer failed or was cancelled
    #[error(transparent)]
    Prompt(#[from] anyhow::Error),
}

/// Errors raised by the dispatch-facing catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Could not decorate {kind}: {source}")]
    Decorate {
        kind: &'static str,
        #[source]
        source: DecorateError,
    },

    #[error("Could not save {kind}: {source}")]
    Save {
        kind: &'static str,
        #[source]
        source: StoreError,
    },
}

impl CatalogError {
    /// True when some value stayed in memory without being persisted
    pub fn is_write_failure(&self) -> bool {
        match self {
            CatalogError::Decorate {
                source: DecorateError::Store(e),
                ..
            } => e.is_write_failure(),
            CatalogError::Save { source, .. } => source.is_write_failure(),
            _ => false,
        }
    }
}
