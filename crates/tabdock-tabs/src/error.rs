//! Tab error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Unknown tabbable mode: {0}")]
    UnknownMode(String),

    #[error("Malformed state node: {0}")]
    MalformedState(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
