//! Recording doubles for widgets and windows
//!
//! Handles are cheap clones sharing one state, so a test can keep a handle
//! while the Tabbable owns another.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::geometry::{Point, Size};
use crate::widget::{Widget, WidgetId, WidgetRef};
use crate::window::{TopLevel, WindowFactory};

#[derive(Debug, Default)]
struct WidgetState {
    visible: AtomicBool,
    shows: AtomicUsize,
    hides: AtomicUsize,
}

#[derive(Debug, Clone)]
pub struct MockWidget {
    id: WidgetId,
    state: Arc<WidgetState>,
}

impl MockWidget {
    pub fn new() -> Self {
        Self {
            id: WidgetId::new(),
            state: Arc::new(WidgetState::default()),
        }
    }

    pub fn new_ref() -> WidgetRef {
        Self::new().into_ref()
    }

    pub fn into_ref(self) -> WidgetRef {
        Arc::new(self)
    }

    pub fn show_count(&self) -> usize {
        self.state.shows.load(Ordering::SeqCst)
    }

    pub fn hide_count(&self) -> usize {
        self.state.hides.load(Ordering::SeqCst)
    }
}

impl Default for MockWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for MockWidget {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn show(&self) {
        self.state.shows.fetch_add(1, Ordering::SeqCst);
        self.state.visible.store(true, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.state.hides.fetch_add(1, Ordering::SeqCst);
        self.state.visible.store(false, Ordering::SeqCst);
    }

    fn is_visible(&self) -> bool {
        self.state.visible.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
struct WindowState {
    title: String,
    visible: bool,
    position: Point,
    size: Size,
    default_size: Option<Size>,
    presents: usize,
    hides: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MockTopLevel {
    state: Arc<Mutex<WindowState>>,
}

impl MockTopLevel {
    pub fn title(&self) -> String {
        self.state.lock().title.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    pub fn position(&self) -> Point {
        self.state.lock().position
    }

    pub fn size(&self) -> Size {
        self.state.lock().size
    }

    pub fn default_size(&self) -> Option<Size> {
        self.state.lock().default_size
    }

    pub fn present_count(&self) -> usize {
        self.state.lock().presents
    }

    pub fn hide_count(&self) -> usize {
        self.state.lock().hides
    }

    /// Simulate the user moving and resizing the window.
    pub fn place(&self, position: Point, size: Size) {
        let mut state = self.state.lock();
        state.position = position;
        state.size = size;
    }
}

impl TopLevel for MockTopLevel {
    fn set_title(&mut self, title: &str) {
        self.state.lock().title = title.to_string();
    }

    fn present(&mut self) {
        let mut state = self.state.lock();
        state.visible = true;
        state.presents += 1;
    }

    fn hide(&mut self) {
        let mut state = self.state.lock();
        state.visible = false;
        state.hides += 1;
    }

    fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    fn set_default_size(&mut self, size: Size) {
        let mut state = self.state.lock();
        state.default_size = Some(size);
        if state.size.is_empty() {
            state.size = size;
        }
    }

    fn position(&self) -> Point {
        self.state.lock().position
    }

    fn size(&self) -> Size {
        self.state.lock().size
    }

    fn move_to(&mut self, position: Point) {
        self.state.lock().position = position;
    }

    fn resize(&mut self, size: Size) {
        self.state.lock().size = size;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockWindowFactory {
    windows: Arc<Mutex<Vec<MockTopLevel>>>,
}

impl MockWindowFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.windows.lock().len()
    }

    pub fn window(&self, index: usize) -> Option<MockTopLevel> {
        self.windows.lock().get(index).cloned()
    }
}

impl WindowFactory for MockWindowFactory {
    fn create(&mut self, title: &str) -> Box<dyn TopLevel> {
        let mut window = MockTopLevel::default();
        window.set_title(title);
        self.windows.lock().push(window.clone());
        Box::new(window)
    }
}
