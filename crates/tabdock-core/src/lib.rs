//! tabdock Core
//!
//! Coordination layer: a [`Desk`] owns every Tabbable of an application,
//! registers them with the shared dock notebook and keeps their state
//! records in the session store.

mod config;
mod desk;
mod error;

pub use config::Config;
pub use desk::Desk;
pub use error::CoreError;

// Re-export core components
pub use tabdock_session::{SavedState, SessionError, StateStore, DOCUMENT_NODE};
pub use tabdock_storage::{Database, StorageError};
pub use tabdock_tabs::{
    Connection, DockHost, Notebook, Point, SharedDockHost, Sidebar, Signal, Size, StateNode,
    StateSnapshot, TabError, Tabbable, TabbableMode, TabbableOptions, TopLevel, Widget,
    WidgetId, WidgetRef, WindowEvent, WindowFactory,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
