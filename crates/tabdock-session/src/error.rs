//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Saved state not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] tabdock_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] tabdock_tabs::TabError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("State name cannot be empty")]
    EmptyName,

    #[error("Malformed state document: {0}")]
    MalformedDocument(String),
}
