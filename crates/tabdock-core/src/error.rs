//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] tabdock_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] tabdock_tabs::TabError),

    #[error("Session error: {0}")]
    Session(#[from] tabdock_session::SessionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tabbable already registered: {0}")]
    DuplicateTabbable(String),

    #[error("Unknown tabbable: {0}")]
    UnknownTabbable(String),
}
