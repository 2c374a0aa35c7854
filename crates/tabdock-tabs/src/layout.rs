//! Content layout regions
//!
//! A full-featured Tabbable's content is a fixed hierarchy of embedding
//! points that other chrome fills in:
//!
//! ```text
//! header:  [ transport            ][ attachments ][ tabbables ]
//! body:    [ strip ][ toolbar / innermost | list ]
//!                   [ props                      ]
//! ```

use crate::widget::{WidgetId, WidgetRef};

/// Default minimum width of the list region, roughly a notebook tab strip.
pub const LIST_PANE_MIN_SIZE: u32 = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Transport,
    Attachments,
    Tabbables,
    Strip,
    Toolbar,
    Innermost,
    List,
    Props,
}

impl RegionKind {
    pub const ALL: [RegionKind; 8] = [
        RegionKind::Transport,
        RegionKind::Attachments,
        RegionKind::Tabbables,
        RegionKind::Strip,
        RegionKind::Toolbar,
        RegionKind::Innermost,
        RegionKind::List,
        RegionKind::Props,
    ];
}

/// The three regions whose visibility is driven by sidebar toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sidebar {
    Strip,
    List,
    Props,
}

impl Sidebar {
    pub fn region(&self) -> RegionKind {
        match self {
            Sidebar::Strip => RegionKind::Strip,
            Sidebar::List => RegionKind::List,
            Sidebar::Props => RegionKind::Props,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sidebar::Strip => "Left",
            Sidebar::List => "Right",
            Sidebar::Props => "Btm",
        }
    }
}

/// An embedding point. Inserting widgets never affects attachment state.
pub struct Region {
    kind: RegionKind,
    children: Vec<WidgetRef>,
    visible: bool,
    min_size: Option<u32>,
}

impl Region {
    fn new(kind: RegionKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            visible: true,
            min_size: None,
        }
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn add(&mut self, widget: WidgetRef) {
        if !self.contains(widget.id()) {
            self.children.push(widget);
        }
    }

    pub fn remove(&mut self, widget: WidgetId) -> Option<WidgetRef> {
        let index = self.children.iter().position(|w| w.id() == widget)?;
        Some(self.children.remove(index))
    }

    pub fn contains(&self, widget: WidgetId) -> bool {
        self.children.iter().any(|w| w.id() == widget)
    }

    pub fn children(&self) -> &[WidgetRef] {
        &self.children
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn min_size(&self) -> Option<u32> {
        self.min_size
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        for child in &self.children {
            if visible {
                child.show();
            } else {
                child.hide();
            }
        }
    }
}

pub struct ContentLayout {
    regions: Vec<Region>,
}

impl ContentLayout {
    pub fn new(list_min_size: u32) -> Self {
        let regions = RegionKind::ALL
            .iter()
            .map(|kind| {
                let mut region = Region::new(*kind);
                if *kind == RegionKind::List {
                    region.min_size = Some(list_min_size);
                }
                region
            })
            .collect();
        Self { regions }
    }

    pub fn region(&self, kind: RegionKind) -> &Region {
        // ALL covers every variant, so the position always exists.
        &self.regions[kind as usize]
    }

    pub fn region_mut(&mut self, kind: RegionKind) -> &mut Region {
        &mut self.regions[kind as usize]
    }

    pub fn show_sidebar(&mut self, sidebar: Sidebar, visible: bool) {
        tracing::debug!(sidebar = sidebar.label(), visible, "Sidebar visibility");
        self.region_mut(sidebar.region()).set_visible(visible);
    }

    pub fn sidebar_visible(&self, sidebar: Sidebar) -> bool {
        self.region(sidebar.region()).is_visible()
    }
}

impl Default for ContentLayout {
    fn default() -> Self {
        Self::new(LIST_PANE_MIN_SIZE)
    }
}
