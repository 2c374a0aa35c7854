//! tabdock Session State
//!
//! - Every Tabbable instance saves one state record, keyed by its
//!   untranslated name
//! - Records are written through to SQLite and cached in memory
//! - All records can be exported as one shared document and imported back

mod error;
mod manager;
mod saved;

pub use error::SessionError;
pub use manager::{StateStore, DOCUMENT_NODE};
pub use saved::SavedState;

pub type Result<T> = std::result::Result<T, SessionError>;
