//! Page container
//!
//! Used as the embedding notebook inside a Tabbable's own window (tabs
//! hidden) and as a ready-made [`DockHost`].

use std::collections::HashSet;

use crate::geometry::Size;
use crate::widget::{DockHost, WidgetId, WidgetRef};

pub struct Notebook {
    pages: Vec<WidgetRef>,
    current: Option<usize>,
    show_tabs: bool,
    detachable: HashSet<WidgetId>,
    reorderable: HashSet<WidgetId>,
    allocation: Option<Size>,
    presented: usize,
}

impl Notebook {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: None,
            show_tabs: true,
            detachable: HashSet::new(),
            reorderable: HashSet::new(),
            allocation: None,
            presented: 0,
        }
    }

    pub fn set_show_tabs(&mut self, show: bool) {
        self.show_tabs = show;
    }

    pub fn shows_tabs(&self) -> bool {
        self.show_tabs
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, widget: WidgetId) -> bool {
        self.page_index_of(widget).is_some()
    }

    pub fn page(&self, index: usize) -> Option<&WidgetRef> {
        self.pages.get(index)
    }

    pub fn is_tab_detachable(&self, widget: WidgetId) -> bool {
        self.detachable.contains(&widget)
    }

    pub fn is_tab_reorderable(&self, widget: WidgetId) -> bool {
        self.reorderable.contains(&widget)
    }

    /// Record the size the toolkit gave the page area.
    pub fn set_allocation(&mut self, size: Size) {
        self.allocation = Some(size);
    }

    /// How many times the containing window was raised through this host.
    pub fn presented_count(&self) -> usize {
        self.presented
    }

    /// Move a page to `index`, clamped to the page range.
    pub fn reorder_page(&mut self, widget: WidgetId, index: usize) {
        let Some(from) = self.page_index_of(widget) else {
            return;
        };
        let current_id = self.current.and_then(|i| self.pages.get(i)).map(|w| w.id());

        let page = self.pages.remove(from);
        let to = index.min(self.pages.len());
        self.pages.insert(to, page);

        self.current = current_id.and_then(|id| self.page_index_of(id));
    }
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}

impl DockHost for Notebook {
    fn append_page(&mut self, widget: WidgetRef) -> usize {
        if let Some(index) = self.page_index_of(widget.id()) {
            return index;
        }
        self.pages.push(widget);
        if self.current.is_none() {
            self.current = Some(0);
        }
        self.pages.len() - 1
    }

    fn remove_page(&mut self, widget: WidgetId) {
        let Some(index) = self.page_index_of(widget) else {
            return;
        };
        self.pages.remove(index);
        self.detachable.remove(&widget);
        self.reorderable.remove(&widget);

        self.current = match self.current {
            _ if self.pages.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) => Some(current.min(self.pages.len() - 1)),
            None => None,
        };
    }

    fn page_index_of(&self, widget: WidgetId) -> Option<usize> {
        self.pages.iter().position(|w| w.id() == widget)
    }

    fn set_current_page(&mut self, index: usize) {
        if index < self.pages.len() {
            self.current = Some(index);
        }
    }

    fn current_page(&self) -> Option<usize> {
        self.current
    }

    fn set_tab_detachable(&mut self, widget: WidgetId, detachable: bool) {
        if detachable {
            self.detachable.insert(widget);
        } else {
            self.detachable.remove(&widget);
        }
    }

    fn set_tab_reorderable(&mut self, widget: WidgetId, reorderable: bool) {
        if reorderable {
            self.reorderable.insert(widget);
        } else {
            self.reorderable.remove(&widget);
        }
    }

    fn allocation(&self) -> Option<Size> {
        self.allocation
    }

    fn present_toplevel(&mut self) {
        self.presented += 1;
    }
}
