//! Widget handles and the dock host seam
//!
//! The application owns its widgets. Tabbables and hosts only hold shared
//! handles and decide where a widget is parented.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(Uuid);

impl WidgetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A toolkit widget as seen by the docking layer.
///
/// Show/hide take `&self`; implementations forward to the toolkit or keep
/// interior state.
pub trait Widget: Send + Sync {
    fn id(&self) -> WidgetId;
    fn show(&self);
    fn hide(&self);
    fn is_visible(&self) -> bool;
}

pub type WidgetRef = Arc<dyn Widget>;

/// The shared tabbed notebook that Tabbables dock their content into.
pub trait DockHost: Send + Sync {
    /// Append `widget` as the last page and return its index.
    fn append_page(&mut self, widget: WidgetRef) -> usize;

    /// Remove the page holding `widget`. Absent widgets are ignored.
    fn remove_page(&mut self, widget: WidgetId);

    fn page_index_of(&self, widget: WidgetId) -> Option<usize>;

    fn set_current_page(&mut self, index: usize);

    fn current_page(&self) -> Option<usize>;

    fn set_tab_detachable(&mut self, widget: WidgetId, detachable: bool);

    fn set_tab_reorderable(&mut self, widget: WidgetId, reorderable: bool);

    /// Size of the page area, once the host has been laid out.
    fn allocation(&self) -> Option<Size> {
        None
    }

    /// Raise the top-level window that contains this host.
    fn present_toplevel(&mut self) {}
}

pub type SharedDockHost = Arc<RwLock<dyn DockHost>>;
