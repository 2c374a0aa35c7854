//! Top-level windows and their proxy
//!
//! A [`WindowProxy`] creates its platform window lazily, exactly once, and
//! keeps the last known placement so a hidden window reappears where the
//! user left it.

use crate::geometry::{GeometryStore, Point, Size};
use crate::node::StateNode;

/// Node name of the base window record.
pub const WINDOW_NODE: &str = "Window";

/// A platform top-level window.
pub trait TopLevel: Send {
    fn set_title(&mut self, title: &str);
    fn present(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
    fn set_default_size(&mut self, size: Size);
    fn position(&self) -> Point;
    fn size(&self) -> Size;
    fn move_to(&mut self, position: Point);
    fn resize(&mut self, size: Size);
}

/// Creates platform windows on demand.
pub trait WindowFactory: Send {
    fn create(&mut self, title: &str) -> Box<dyn TopLevel>;
}

/// Window-manager notifications routed from the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Mapped,
    Unmapped,
    /// The user asked to close the window. It is hidden, never destroyed.
    DeleteRequested,
}

pub struct WindowProxy {
    /// Untranslated name, used as the persistence key
    name: String,
    /// User-visible title
    title: String,
    factory: Box<dyn WindowFactory>,
    window: Option<Box<dyn TopLevel>>,
    geometry: GeometryStore,
}

impl WindowProxy {
    pub fn new(title: &str, name: &str, factory: Box<dyn WindowFactory>) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            factory,
            window: None,
            geometry: GeometryStore::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn exists(&self) -> bool {
        self.window.is_some()
    }

    pub fn get(&self) -> Option<&dyn TopLevel> {
        self.window.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut (dyn TopLevel + 'static)> {
        self.window.as_deref_mut()
    }

    /// Return the window, creating it on first use. The flag is `true` only
    /// for the call that created it.
    pub fn ensure(&mut self) -> (&mut dyn TopLevel, bool) {
        let created = self.window.is_none();
        if created {
            tracing::debug!(name = %self.name, "Creating own window");
        }
        let factory = &mut self.factory;
        let title = &self.title;
        let window = self.window.get_or_insert_with(|| {
            let mut window = factory.create(title);
            window.set_title(title);
            window
        });
        (window.as_mut(), created)
    }

    pub fn is_visible(&self) -> bool {
        self.window.as_ref().is_some_and(|w| w.is_visible())
    }

    pub fn present(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.present();
            self.geometry.visible = true;
        }
    }

    pub fn hide(&mut self) {
        self.save_pos_and_size();
        if let Some(window) = self.window.as_mut() {
            window.hide();
            self.geometry.visible = false;
        }
    }

    /// Show a hidden window at its saved place, or hide a visible one.
    pub fn toggle(&mut self) {
        if !self.exists() {
            self.ensure();
            self.set_pos_and_size();
            self.present();
        } else if self.is_visible() {
            self.hide();
        } else {
            self.set_pos();
            self.present();
        }
    }

    pub fn set_default_size(&mut self, size: Size) {
        if size.is_empty() {
            return;
        }
        if let Some(window) = self.window.as_mut() {
            window.set_default_size(size);
        }
    }

    pub fn save_pos_and_size(&mut self) {
        if let Some(window) = self.window.as_ref() {
            self.geometry.remember(window.position(), window.size());
        }
    }

    pub fn set_pos(&mut self) {
        if let (Some(window), Some(position)) = (self.window.as_mut(), self.geometry.position) {
            window.move_to(position);
        }
    }

    pub fn set_pos_and_size(&mut self) {
        self.set_pos();
        if let (Some(window), Some(size)) = (self.window.as_mut(), self.geometry.size) {
            window.resize(size);
        }
    }

    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut GeometryStore {
        &mut self.geometry
    }

    /// Record a window-manager notification in the saved visibility.
    pub fn note_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Mapped => self.geometry.visible = true,
            WindowEvent::Unmapped => self.geometry.visible = false,
            WindowEvent::DeleteRequested => self.hide(),
        }
    }

    /// Base window record: `name`, `visible`, `x`, `y`, `w`, `h` and any
    /// divider fractions.
    pub fn get_state(&self) -> StateNode {
        let mut geometry = self.geometry.clone();
        if let Some(window) = self.window.as_ref() {
            geometry.remember(window.position(), window.size());
            geometry.visible = window.is_visible();
        }

        let mut node = StateNode::new(WINDOW_NODE);
        node.set_property("name", &self.name);
        geometry.write_to(&mut node);
        node
    }

    /// Restore placement from `node`, which is either this proxy's window
    /// record or a parent holding it. Returns the record that was used.
    pub fn set_state<'a>(&mut self, node: &'a StateNode) -> Option<&'a StateNode> {
        let window_node = if node.name == WINDOW_NODE
            && node.raw_property("name").map_or(true, |n| n == self.name)
        {
            node
        } else {
            node.child_with(WINDOW_NODE, "name", &self.name)
                .or_else(|| node.child(WINDOW_NODE))?
        };

        self.geometry.read_from(window_node);
        tracing::debug!(
            name = %self.name,
            visible = self.geometry.visible,
            position = ?self.geometry.position,
            size = ?self.geometry.size,
            "Restored window placement"
        );
        Some(window_node)
    }

    /// Drop the platform window. Only done at teardown.
    pub fn destroy(&mut self) {
        if let Some(mut window) = self.window.take() {
            window.hide();
            tracing::debug!(name = %self.name, "Destroyed own window");
        }
    }
}

impl Drop for WindowProxy {
    fn drop(&mut self) {
        self.destroy();
    }
}
