//! tabdock Storage Layer
//!
//! SQLite-based persistence for panel attachment and geometry state.
//! Bulk writes of state records go through one transaction.

mod database;
mod error;
mod migrations;

pub use database::{Database, StateRow};
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
