//! tabdock Tabbables
//!
//! A Tabbable owns the *parentage* of one content widget and moves it between
//! a page of a shared dock notebook and a top-level window of its own:
//!
//! ```text
//!  Unrealized ──attach──▶ Tabbed ◀──attach── Windowed
//!       │                   │                   ▲
//!       └──────detach───────┴──────detach───────┘
//! ```
//!
//! The content is never visible in two trees at once, and every completed
//! transition is announced once through `Tabbable::state_change`.

mod actions;
mod error;
mod geometry;
mod layout;
mod mode;
mod node;
mod notebook;
mod signal;
mod tabbable;
mod widget;
mod window;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use actions::{SidebarActions, ToggleAction};
pub use error::TabError;
pub use geometry::{GeometryStore, Point, Size, MAX_LIST_PANE_FRACTION};
pub use layout::{ContentLayout, Region, RegionKind, Sidebar};
pub use mode::TabbableMode;
pub use node::StateNode;
pub use notebook::Notebook;
pub use signal::{Connection, Signal};
pub use tabbable::{StateSnapshot, Tabbable, TabbableOptions, TABBABLE_NODE};
pub use widget::{DockHost, SharedDockHost, Widget, WidgetId, WidgetRef};
pub use window::{TopLevel, WindowEvent, WindowFactory, WindowProxy, WINDOW_NODE};

pub type Result<T> = std::result::Result<T, TabError>;
