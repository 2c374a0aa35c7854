//! Tabbable: one content widget, docked as a tab or floating in its own window
//!
//! The content's parent is only ever changed here. It is hidden before it
//! leaves a parent and shown again once it has been packed into the new one,
//! and observers hear about a transition only after it has completed.

use parking_lot::RwLock;
use std::sync::{Arc, Weak};

use crate::actions::SidebarActions;
use crate::geometry::{clamp_fraction, Size, MAX_LIST_PANE_FRACTION};
use crate::layout::{ContentLayout, Region, RegionKind, Sidebar, LIST_PANE_MIN_SIZE};
use crate::mode::TabbableMode;
use crate::node::StateNode;
use crate::notebook::Notebook;
use crate::signal::Signal;
use crate::widget::{DockHost, SharedDockHost, WidgetRef};
use crate::window::{TopLevel, WindowEvent, WindowFactory, WindowProxy};

/// Node name of the record written by [`Tabbable::get_state`].
pub const TABBABLE_NODE: &str = "Tabbable";

const DEFAULT_LIST_PANE_FRACTION: f32 = 0.5;

type SetupHook = Box<dyn FnMut(&mut dyn TopLevel) + Send>;

/// Construction-time settings.
#[derive(Debug, Clone)]
pub struct TabbableOptions {
    /// Initial `tabbed_by_default` preference
    pub tabbed_by_default: bool,
    /// Size given to the own window when it is created without a prior
    /// parent allocation, before `ui_scale` is applied
    pub default_window_size: Size,
    pub ui_scale: f32,
    pub list_pane_min_size: u32,
    /// Upper bound applied to the list-pane divider on restore
    pub max_list_pane_fraction: f32,
    pub sidebar_actions: SidebarActions,
}

impl Default for TabbableOptions {
    fn default() -> Self {
        Self {
            tabbed_by_default: true,
            default_window_size: Size::new(800, 600),
            ui_scale: 1.0,
            list_pane_min_size: LIST_PANE_MIN_SIZE,
            max_list_pane_fraction: MAX_LIST_PANE_FRACTION,
            sidebar_actions: SidebarActions::default(),
        }
    }
}

/// What observers of [`Tabbable::state_change`] receive.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub name: String,
    pub mode: TabbableMode,
    pub tabbed_by_default: bool,
    pub window_visible: bool,
}

pub struct Tabbable {
    contents: WidgetRef,
    window: WindowProxy,
    /// Embedding notebook inside the own window; its tabs are never shown
    own_notebook: Notebook,
    dock_host: Option<Weak<RwLock<dyn DockHost>>>,
    tab_requested_by_state: bool,
    layout: ContentLayout,
    actions: SidebarActions,
    default_window_size: Size,
    ui_scale: f32,
    max_list_pane_fraction: f32,
    setup: Option<SetupHook>,
    last_emitted: Option<StateSnapshot>,
    /// Non-zero while a restore is in progress; emissions are held back
    batch_depth: u32,
    state_change: Signal<StateSnapshot>,
    tabbed_changed: Signal<bool>,
}

impl Tabbable {
    pub fn new(
        contents: WidgetRef,
        title: &str,
        name: &str,
        factory: Box<dyn WindowFactory>,
        options: TabbableOptions,
    ) -> Self {
        let mut own_notebook = Notebook::new();
        own_notebook.set_show_tabs(false);

        let max_list_pane_fraction =
            if (0.0..=MAX_LIST_PANE_FRACTION).contains(&options.max_list_pane_fraction) {
                options.max_list_pane_fraction
            } else {
                let clamped = if options.max_list_pane_fraction.is_nan() {
                    MAX_LIST_PANE_FRACTION
                } else {
                    clamp_fraction(options.max_list_pane_fraction, MAX_LIST_PANE_FRACTION)
                };
                tracing::warn!(
                    value = options.max_list_pane_fraction,
                    clamped,
                    "List pane limit out of range"
                );
                clamped
            };

        Self {
            contents,
            window: WindowProxy::new(title, name, factory),
            own_notebook,
            dock_host: None,
            tab_requested_by_state: options.tabbed_by_default,
            layout: ContentLayout::new(options.list_pane_min_size),
            actions: options.sidebar_actions,
            default_window_size: options.default_window_size,
            ui_scale: if options.ui_scale > 0.0 { options.ui_scale } else { 1.0 },
            max_list_pane_fraction,
            setup: None,
            last_emitted: None,
            batch_depth: 0,
            state_change: Signal::new(),
            tabbed_changed: Signal::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.window.name()
    }

    pub fn title(&self) -> &str {
        self.window.title()
    }

    pub fn contents(&self) -> &WidgetRef {
        &self.contents
    }

    /// Fired once after every completed attach, detach or visibility change.
    pub fn state_change(&self) -> &Signal<StateSnapshot> {
        &self.state_change
    }

    /// Fired with `true` when the content is docked and `false` when it is
    /// placed in its own window.
    pub fn tabbed_changed(&self) -> &Signal<bool> {
        &self.tabbed_changed
    }

    /// Run `hook` once, right after the own window is created, so
    /// collaborators can finish decorating it.
    pub fn set_window_setup<F>(&mut self, hook: F)
    where
        F: FnMut(&mut dyn TopLevel) + Send + 'static,
    {
        self.setup = Some(Box::new(hook));
    }

    /// Register the shared notebook. Only one live host is accepted; if
    /// docking was requested the content is attached immediately.
    pub fn add_to_notebook(&mut self, host: &SharedDockHost) {
        if let Some(current) = self.dock_host() {
            if !Arc::ptr_eq(&current, host) {
                tracing::warn!(name = %self.name(), "Tabbable already has a dock host");
            }
            return;
        }

        self.dock_host = Some(Arc::downgrade(host));

        if self.tab_requested_by_state {
            self.attach();
        }
    }

    pub fn has_dock_host(&self) -> bool {
        self.dock_host().is_some()
    }

    fn dock_host(&self) -> Option<SharedDockHost> {
        self.dock_host.as_ref().and_then(Weak::upgrade)
    }

    // === Queries ===

    pub fn mode(&self) -> TabbableMode {
        if self.in_own_window() {
            TabbableMode::Windowed
        } else if self.dock_page_index().is_some() {
            TabbableMode::Tabbed
        } else {
            TabbableMode::Unrealized
        }
    }

    pub fn is_tabbed(&self) -> bool {
        self.mode().is_tabbed()
    }

    pub fn window_visible(&self) -> bool {
        self.window.is_visible()
    }

    /// The persisted preference: dock when the next chance comes.
    pub fn tabbed_by_default(&self) -> bool {
        self.tab_requested_by_state
    }

    pub fn set_default_tabbed(&mut self, yn: bool) {
        self.tab_requested_by_state = yn;
    }

    pub fn own_window(&self) -> Option<&dyn TopLevel> {
        self.window.get()
    }

    pub fn own_notebook(&self) -> &Notebook {
        &self.own_notebook
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            name: self.name().to_string(),
            mode: self.mode(),
            tabbed_by_default: self.tab_requested_by_state,
            window_visible: self.window.is_visible(),
        }
    }

    fn in_own_window(&self) -> bool {
        self.window.exists() && self.own_notebook.contains(self.contents.id())
    }

    fn dock_page_index(&self) -> Option<usize> {
        let host = self.dock_host()?;
        let index = host.read().page_index_of(self.contents.id());
        index
    }

    // === Transitions ===

    /// Dock the content as a page of the registered host.
    ///
    /// Without a host this does nothing: hosts may appear after construction,
    /// and the next registration attaches if docking was requested.
    pub fn attach(&mut self) {
        let Some(host) = self.dock_host() else {
            tracing::debug!(name = %self.name(), "Attach requested without dock host");
            return;
        };

        if self.is_tabbed() {
            return;
        }

        let before = self.snapshot();
        let id = self.contents.id();

        self.contents.hide();
        if self.in_own_window() {
            self.own_notebook.remove_page(id);
        }
        if self.window.is_visible() {
            // leave the window around, hidden, with its placement saved
            self.window.hide();
        }

        {
            let mut host = host.write();
            let index = host.append_page(Arc::clone(&self.contents));
            host.set_tab_detachable(id, true);
            host.set_tab_reorderable(id, true);
            host.set_current_page(index);
        }

        self.contents.show();

        // the user has effectively asked for it
        self.tab_requested_by_state = true;

        self.emit_tabbed_changed(true);
        self.notify_if_changed(&before);
    }

    /// Move the content into the own window and show it.
    pub fn detach(&mut self) {
        if self.in_own_window() && self.window.is_visible() {
            return;
        }

        self.show_own_window(true);
        self.emit_tabbed_changed(false);
    }

    /// Bring the content to the user's attention wherever it belongs.
    pub fn make_visible(&mut self) {
        if self.in_own_window() {
            let before = self.snapshot();
            if !self.window.is_visible() {
                self.window.set_pos();
            }
            self.window.present();
            self.notify_if_changed(&before);
        } else if !self.tab_requested_by_state {
            self.show_own_window(true);
        } else {
            self.show_tab();
        }
    }

    /// Hide the own window, or take the page out of the dock host.
    pub fn make_invisible(&mut self) {
        if self.in_own_window() {
            let before = self.snapshot();
            self.window.hide();
            self.notify_if_changed(&before);
        } else {
            self.hide_tab();
        }
    }

    /// Tabs cannot be hidden on their own, so a docked Tabbable only selects
    /// its page; a windowed one toggles its window.
    pub fn change_visibility(&mut self) {
        if self.in_own_window() {
            let before = self.snapshot();
            self.window.toggle();
            self.notify_if_changed(&before);
            return;
        }

        if let Some(host) = self.dock_host() {
            let mut host = host.write();
            if let Some(index) = host.page_index_of(self.contents.id()) {
                host.set_current_page(index);
            }
        }
    }

    /// Called after a tab was dropped onto the desktop. Puts the Tabbable in
    /// windowed mode and returns the notebook the drop target must pack the
    /// content into; the packing itself is left to the caller.
    pub fn tab_root_drop(&mut self) -> &mut Notebook {
        let before = self.snapshot();
        let allocation = self.parent_allocation();

        self.ensure_window();
        if !self.in_own_window() {
            self.release_contents();
        }
        if let Some(size) = allocation {
            self.window.set_default_size(size);
        }

        self.tab_requested_by_state = false;
        self.window.present();
        self.notify_if_changed(&before);

        &mut self.own_notebook
    }

    /// Route a window-manager notification for the own window.
    pub fn handle_window_event(&mut self, event: WindowEvent) {
        self.window.note_event(event);

        if self.last_emitted.as_ref() != Some(&self.snapshot()) {
            self.emit_state_change();
        }
    }

    /// The own window, created on first use.
    pub fn ensure_window(&mut self) -> &mut dyn TopLevel {
        let (window, created) = self.window.ensure();
        if created {
            window.set_default_size(self.default_window_size.scaled(self.ui_scale));
            if let Some(setup) = self.setup.as_mut() {
                setup(&mut *window);
            }
        }
        window
    }

    fn show_own_window(&mut self, and_pack_it: bool) {
        let before = self.snapshot();
        let was_visible = self.window.is_visible();
        let allocation = self.parent_allocation();

        self.use_own_window(and_pack_it);

        match allocation {
            Some(size) => {
                self.window.set_default_size(size);
                if !was_visible {
                    self.window.set_pos();
                }
            }
            None if !was_visible => self.window.set_pos_and_size(),
            None => {}
        }

        self.tab_requested_by_state = false;
        self.window.present();
        self.notify_if_changed(&before);
    }

    fn use_own_window(&mut self, and_pack_it: bool) {
        self.ensure_window();

        if and_pack_it && !self.own_notebook.contains(self.contents.id()) {
            self.release_contents();
            self.own_notebook.append_page(Arc::clone(&self.contents));
            self.contents.show();
        }
    }

    /// Take the content out of the dock host, hidden. The own notebook is
    /// left alone.
    fn release_contents(&mut self) {
        let Some(host) = self.dock_host() else {
            return;
        };
        let id = self.contents.id();
        let docked = host.read().page_index_of(id).is_some();
        if docked {
            self.contents.hide();
            host.write().remove_page(id);
        }
    }

    fn parent_allocation(&self) -> Option<Size> {
        if self.in_own_window() {
            return None;
        }
        self.dock_page_index()?;
        let host = self.dock_host()?;
        let allocation = host.read().allocation();
        allocation
    }

    fn show_tab(&mut self) {
        if self.window.is_visible() {
            return;
        }
        let Some(host) = self.dock_host() else {
            return;
        };

        if self.mode() == TabbableMode::Unrealized {
            self.tab_requested_by_state = true;
            self.attach();
        }

        let id = self.contents.id();
        let mut host = host.write();
        if let Some(index) = host.page_index_of(id) {
            host.set_current_page(index);
        }
        self.contents.show();
        host.present_toplevel();
    }

    fn hide_tab(&mut self) {
        if !self.is_tabbed() {
            return;
        }
        let Some(host) = self.dock_host() else {
            return;
        };

        let before = self.snapshot();
        self.contents.hide();
        host.write().remove_page(self.contents.id());
        self.notify_if_changed(&before);
    }

    // === Sidebars ===

    pub fn strip_button_toggled(&mut self) {
        self.sidebar_toggled(Sidebar::Strip);
    }

    pub fn list_button_toggled(&mut self) {
        self.sidebar_toggled(Sidebar::List);
    }

    pub fn props_button_toggled(&mut self) {
        self.sidebar_toggled(Sidebar::Props);
    }

    fn sidebar_toggled(&mut self, sidebar: Sidebar) {
        let action = match sidebar {
            Sidebar::Strip => self.actions.strip.as_ref(),
            Sidebar::List => self.actions.list.as_ref(),
            Sidebar::Props => self.actions.props.as_ref(),
        };
        if let Some(action) = action {
            let active = action.is_active();
            self.layout.show_sidebar(sidebar, active);
        }
    }

    pub fn showhide_sidebar(&mut self, sidebar: Sidebar, yn: bool) {
        self.layout.show_sidebar(sidebar, yn);
    }

    pub fn sidebar_visible(&self, sidebar: Sidebar) -> bool {
        self.layout.sidebar_visible(sidebar)
    }

    pub fn sidebar_actions(&self) -> &SidebarActions {
        &self.actions
    }

    pub fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut ContentLayout {
        &mut self.layout
    }

    /// Where chrome such as the tab switcher buttons is packed.
    pub fn content_tabbables_region(&mut self) -> &mut Region {
        self.layout.region_mut(RegionKind::Tabbables)
    }

    fn list_pane_key(&self) -> String {
        format!("{}-listpane-pos", self.name())
    }

    pub fn list_pane_divider(&self) -> f32 {
        self.window
            .geometry()
            .divider(&self.list_pane_key())
            .unwrap_or(DEFAULT_LIST_PANE_FRACTION)
    }

    pub fn set_list_pane_divider(&mut self, fraction: f32) {
        let key = self.list_pane_key();
        self.window
            .geometry_mut()
            .set_divider(key, clamp_fraction(fraction, 1.0));
    }

    // === Persistence ===

    /// `Tabbable { name, tabbed, <name>-listpane-pos }` wrapping the base
    /// `Window` record, which carries the same two facts.
    pub fn get_state(&self) -> StateNode {
        let tabbed = self.is_tabbed();
        let key = self.list_pane_key();
        let divider = self.list_pane_divider();

        let mut window_node = self.window.get_state();
        window_node.set_property("tabbed", tabbed);
        window_node.set_property(key.as_str(), divider);

        let mut node = StateNode::new(TABBABLE_NODE);
        node.set_property("name", self.name());
        node.set_property("tabbed", tabbed);
        node.set_property(key, divider);
        node.add_child(window_node);
        node
    }

    /// Restore placement, preference and divider from `node`, then settle
    /// into the saved mode. Emits one `tabbed_changed` and one
    /// `state_change` describing the final state.
    pub fn set_state(&mut self, node: &StateNode) {
        self.batch_depth += 1;

        let window_node = self.window.set_state(node);
        let was_visible = self.window.geometry().visible;

        if was_visible {
            // show it where the user left it; the saved size wins over the
            // dock allocation
            self.show_own_window(true);
            self.window.set_pos_and_size();
        }

        let requested = window_node
            .and_then(|w| w.bool_property("tabbed"))
            .or_else(|| node.bool_property("tabbed"));
        if let Some(requested) = requested {
            self.tab_requested_by_state = requested;
        }

        let key = self.list_pane_key();
        let max = self.max_list_pane_fraction;
        let geometry = self.window.geometry_mut();
        let restored = window_node.and_then(|w| geometry.read_divider(w, &key, max));
        if restored.is_none() {
            geometry.read_divider(node, &key, max);
        }

        if self.tab_requested_by_state {
            self.attach();
        } else if !was_visible {
            self.hide_tab();
        }

        self.batch_depth -= 1;

        tracing::debug!(
            name = %self.name(),
            mode = %self.mode(),
            tabbed_by_default = self.tab_requested_by_state,
            "Restored tabbable state"
        );

        self.emit_tabbed_changed(self.is_tabbed());
        self.emit_state_change();
    }

    // === Notifications ===

    fn notify_if_changed(&mut self, before: &StateSnapshot) {
        let after = self.snapshot();
        if after == *before {
            return;
        }

        if after.mode != before.mode {
            debug_assert!(
                before.mode.can_transition_to(after.mode),
                "invalid transition {} -> {}",
                before.mode,
                after.mode
            );
            tracing::debug!(
                name = %after.name,
                from = %before.mode,
                to = %after.mode,
                "Tabbable transition"
            );
        }

        self.emit_state_change();
    }

    fn emit_state_change(&mut self) {
        if self.batch_depth > 0 {
            return;
        }
        let snapshot = self.snapshot();
        self.last_emitted = Some(snapshot.clone());
        self.state_change.emit(&snapshot);
    }

    fn emit_tabbed_changed(&self, tabbed: bool) {
        if self.batch_depth == 0 {
            self.tabbed_changed.emit(&tabbed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ToggleAction;
    use crate::geometry::Point;
    use crate::mock::{MockWidget, MockWindowFactory};
    use crate::widget::Widget;
    use parking_lot::Mutex;

    struct Fixture {
        tabbable: Tabbable,
        content: MockWidget,
        factory: MockWindowFactory,
        host: Arc<RwLock<Notebook>>,
        events: Arc<Mutex<Vec<StateSnapshot>>>,
        tabbed: Arc<Mutex<Vec<bool>>>,
        _connections: Vec<crate::signal::Connection>,
    }

    impl Fixture {
        fn new(tabbed_by_default: bool) -> Self {
            let content = MockWidget::new();
            let factory = MockWindowFactory::new();
            let options = TabbableOptions {
                tabbed_by_default,
                ..TabbableOptions::default()
            };
            let tabbable = Tabbable::new(
                content.clone().into_ref(),
                "Editor",
                "editor",
                Box::new(factory.clone()),
                options,
            );

            let events = Arc::new(Mutex::new(Vec::new()));
            let tabbed = Arc::new(Mutex::new(Vec::new()));
            let e = Arc::clone(&events);
            let t = Arc::clone(&tabbed);
            let connections = vec![
                tabbable
                    .state_change()
                    .connect(move |s: &StateSnapshot| e.lock().push(s.clone())),
                tabbable.tabbed_changed().connect(move |v: &bool| t.lock().push(*v)),
            ];

            Self {
                tabbable,
                content,
                factory,
                host: Arc::new(RwLock::new(Notebook::new())),
                events,
                tabbed,
                _connections: connections,
            }
        }

        fn shared_host(&self) -> SharedDockHost {
            self.host.clone()
        }

        fn register(&mut self) {
            let host = self.shared_host();
            self.tabbable.add_to_notebook(&host);
        }

        fn event_count(&self) -> usize {
            self.events.lock().len()
        }

        /// Number of containers currently holding the content.
        fn parent_count(&self) -> usize {
            let id = self.content.id();
            let in_host = self.host.read().page_index_of(id).is_some() as usize;
            let in_window = self.tabbable.own_notebook().contains(id) as usize;
            in_host + in_window
        }
    }

    #[test]
    fn test_attach_then_detach_scenario() {
        let mut fx = Fixture::new(true);
        assert_eq!(fx.tabbable.mode(), TabbableMode::Unrealized);
        assert!(fx.tabbable.tabbed_by_default());

        fx.register();
        fx.tabbable.attach();

        assert!(fx.tabbable.is_tabbed());
        assert!(fx.content.is_visible());
        assert_eq!(fx.event_count(), 1);
        assert_eq!(fx.host.read().current_page(), Some(0));
        assert!(fx.host.read().is_tab_detachable(fx.content.id()));
        assert!(fx.host.read().is_tab_reorderable(fx.content.id()));

        fx.tabbable.detach();

        assert!(!fx.tabbable.is_tabbed());
        assert_eq!(fx.tabbable.mode(), TabbableMode::Windowed);
        assert!(fx.tabbable.window_visible());
        assert_eq!(fx.event_count(), 2);
        assert!(fx.host.read().is_empty());
        assert!(fx.content.is_visible());
        assert_eq!(*fx.tabbed.lock(), vec![true, false]);
    }

    #[test]
    fn test_attach_without_host_is_noop() {
        let mut fx = Fixture::new(true);
        fx.tabbable.attach();

        assert_eq!(fx.tabbable.mode(), TabbableMode::Unrealized);
        assert_eq!(fx.event_count(), 0);
        assert!(fx.tabbed.lock().is_empty());
    }

    #[test]
    fn test_dropped_host_counts_as_absent() {
        let mut fx = Fixture::new(false);
        fx.register();
        fx.host = Arc::new(RwLock::new(Notebook::new()));

        assert!(!fx.tabbable.has_dock_host());
        fx.tabbable.attach();
        assert_eq!(fx.event_count(), 0);
    }

    #[test]
    fn test_registration_attaches_when_requested() {
        let mut fx = Fixture::new(true);
        fx.register();
        assert!(fx.tabbable.is_tabbed());

        let mut fx = Fixture::new(false);
        fx.register();
        assert_eq!(fx.tabbable.mode(), TabbableMode::Unrealized);
    }

    #[test]
    fn test_second_host_rejected() {
        let mut fx = Fixture::new(true);
        fx.register();

        let other: SharedDockHost = Arc::new(RwLock::new(Notebook::new()));
        fx.tabbable.add_to_notebook(&other);
        assert_eq!(fx.host.read().len(), 1);
        assert_eq!(other.read().page_index_of(fx.content.id()), None);
    }

    #[test]
    fn test_attach_and_detach_are_idempotent() {
        let mut fx = Fixture::new(true);
        fx.register();
        fx.tabbable.attach();
        let after_first = fx.tabbable.snapshot();
        fx.tabbable.attach();
        assert_eq!(fx.tabbable.snapshot(), after_first);
        assert_eq!(fx.host.read().len(), 1);
        assert_eq!(fx.event_count(), 1);

        fx.tabbable.detach();
        let after_first = fx.tabbable.snapshot();
        fx.tabbable.detach();
        assert_eq!(fx.tabbable.snapshot(), after_first);
        assert_eq!(fx.tabbable.own_notebook().len(), 1);
        assert_eq!(fx.event_count(), 2);
    }

    #[test]
    fn test_window_created_once_and_reused() {
        let mut fx = Fixture::new(true);
        fx.register();

        for _ in 0..3 {
            fx.tabbable.detach();
            fx.tabbable.attach();
        }

        assert_eq!(fx.factory.created(), 1);
        let window = fx.factory.window(0).unwrap();
        assert!(!window.is_visible());
        assert!(fx.tabbable.is_tabbed());
    }

    #[test]
    fn test_setup_hook_runs_once() {
        let mut fx = Fixture::new(false);
        let calls = Arc::new(Mutex::new(0));
        let c = Arc::clone(&calls);
        fx.tabbable.set_window_setup(move |window| {
            window.set_title("Editor - decorated");
            *c.lock() += 1;
        });

        fx.tabbable.detach();
        fx.tabbable.make_invisible();
        fx.tabbable.detach();

        assert_eq!(*calls.lock(), 1);
        assert_eq!(fx.factory.window(0).unwrap().title(), "Editor - decorated");
    }

    #[test]
    fn test_exclusive_parent_over_sequences() {
        let mut fx = Fixture::new(true);
        fx.register();

        let steps: [fn(&mut Tabbable); 6] = [
            Tabbable::attach,
            Tabbable::detach,
            Tabbable::make_visible,
            Tabbable::make_invisible,
            Tabbable::change_visibility,
            |t| {
                t.tab_root_drop();
            },
        ];

        for round in 0..60usize {
            let step = steps[(round * 7 + round / 6) % steps.len()];
            step(&mut fx.tabbable);
            assert!(fx.parent_count() <= 1, "two parents after step {round}");
        }
    }

    #[test]
    fn test_detach_uses_parent_allocation() {
        let mut fx = Fixture::new(true);
        fx.host.write().set_allocation(Size::new(1024, 700));
        fx.register();

        fx.tabbable.detach();
        let window = fx.factory.window(0).unwrap();
        assert_eq!(window.default_size(), Some(Size::new(1024, 700)));
    }

    #[test]
    fn test_new_window_uses_scaled_default_size() {
        let content = MockWidget::new();
        let factory = MockWindowFactory::new();
        let options = TabbableOptions {
            tabbed_by_default: false,
            default_window_size: Size::new(400, 300),
            ui_scale: 2.0,
            ..TabbableOptions::default()
        };
        let mut tabbable = Tabbable::new(
            content.into_ref(),
            "Mixer",
            "mixer",
            Box::new(factory.clone()),
            options,
        );

        tabbable.detach();
        assert_eq!(factory.window(0).unwrap().size(), Size::new(800, 600));
    }

    #[test]
    fn test_reattach_restores_saved_position() {
        let mut fx = Fixture::new(false);
        fx.register();
        fx.tabbable.detach();

        let window = fx.factory.window(0).unwrap();
        window.place(Point::new(120, 80), Size::new(640, 480));
        fx.tabbable.make_invisible();
        window.place(Point::new(0, 0), Size::new(640, 480));

        fx.tabbable.make_visible();
        assert!(window.is_visible());
        assert_eq!(window.position(), Point::new(120, 80));
    }

    #[test]
    fn test_make_visible_when_not_requested_opens_window() {
        let mut fx = Fixture::new(false);
        fx.register();

        fx.tabbable.make_visible();
        assert_eq!(fx.tabbable.mode(), TabbableMode::Windowed);
        assert!(fx.tabbable.window_visible());
        assert_eq!(fx.event_count(), 1);
    }

    #[test]
    fn test_make_visible_reattaches_hidden_tab() {
        let mut fx = Fixture::new(true);
        fx.register();
        fx.tabbable.make_invisible();
        assert_eq!(fx.tabbable.mode(), TabbableMode::Unrealized);
        assert!(!fx.content.is_visible());

        fx.tabbable.make_visible();
        assert!(fx.tabbable.is_tabbed());
        assert!(fx.content.is_visible());
        assert_eq!(fx.host.read().presented_count(), 1);
    }

    #[test]
    fn test_make_invisible_hides_tab_and_emits() {
        let mut fx = Fixture::new(true);
        fx.register();
        let before = fx.event_count();

        fx.tabbable.make_invisible();
        assert!(fx.host.read().is_empty());
        assert_eq!(fx.event_count(), before + 1);
        assert_eq!(fx.parent_count(), 0);

        // nothing left to hide
        fx.tabbable.make_invisible();
        assert_eq!(fx.event_count(), before + 1);
    }

    #[test]
    fn test_invisible_then_visible_keeps_single_parent() {
        let mut fx = Fixture::new(true);
        fx.register();
        fx.tabbable.detach();

        fx.tabbable.make_invisible();
        fx.tabbable.make_visible();
        assert_eq!(fx.parent_count(), 1);
        assert_eq!(fx.tabbable.mode(), TabbableMode::Windowed);
        assert!(fx.tabbable.window_visible());
    }

    #[test]
    fn test_change_visibility() {
        let mut fx = Fixture::new(true);
        let other = MockWidget::new_ref();
        fx.host.write().append_page(other);
        fx.register();
        fx.host.write().set_current_page(0);

        fx.tabbable.change_visibility();
        assert_eq!(fx.host.read().current_page(), Some(1));
        assert!(fx.tabbable.is_tabbed());

        fx.tabbable.detach();
        fx.tabbable.change_visibility();
        assert!(!fx.tabbable.window_visible());
        fx.tabbable.change_visibility();
        assert!(fx.tabbable.window_visible());
        assert_eq!(fx.tabbable.mode(), TabbableMode::Windowed);
    }

    #[test]
    fn test_tab_root_drop_from_tab() {
        let mut fx = Fixture::new(true);
        fx.register();
        let content = fx.tabbable.contents().clone();

        let notebook = fx.tabbable.tab_root_drop();
        assert!(notebook.is_empty());
        assert!(!notebook.shows_tabs());
        notebook.append_page(content.clone());
        content.show();

        assert!(!fx.tabbable.is_tabbed());
        assert_eq!(fx.tabbable.mode(), TabbableMode::Windowed);
        assert!(!fx.tabbable.tabbed_by_default());
        assert!(fx.host.read().is_empty());
        assert_eq!(fx.parent_count(), 1);
    }

    #[test]
    fn test_tab_root_drop_when_windowed_or_unrealized() {
        let mut fx = Fixture::new(false);
        fx.register();
        let content = fx.tabbable.contents().clone();

        fx.tabbable.tab_root_drop().append_page(content.clone());
        assert!(!fx.tabbable.is_tabbed());

        fx.tabbable.tab_root_drop().append_page(content);
        assert!(!fx.tabbable.is_tabbed());
        assert_eq!(fx.tabbable.own_notebook().len(), 1);
    }

    #[test]
    fn test_window_events_emit_only_on_change() {
        let mut fx = Fixture::new(false);
        fx.register();
        fx.tabbable.detach();
        let count = fx.event_count();

        // already reported as visible
        fx.tabbable.handle_window_event(WindowEvent::Mapped);
        assert_eq!(fx.event_count(), count);

        fx.tabbable.handle_window_event(WindowEvent::DeleteRequested);
        assert!(!fx.tabbable.window_visible());
        assert_eq!(fx.tabbable.mode(), TabbableMode::Windowed);
        assert_eq!(fx.event_count(), count + 1);

        fx.tabbable.handle_window_event(WindowEvent::Unmapped);
        assert_eq!(fx.event_count(), count + 1);
    }

    #[test]
    fn test_sidebar_toggles_follow_actions() {
        let actions = SidebarActions {
            strip: Some(ToggleAction::new("editor-toggle-strip", true)),
            list: Some(ToggleAction::new("editor-toggle-list", true)),
            props: None,
        };
        let options = TabbableOptions {
            sidebar_actions: actions.clone(),
            ..TabbableOptions::default()
        };
        let mut tabbable = Tabbable::new(
            MockWidget::new_ref(),
            "Editor",
            "editor",
            Box::new(MockWindowFactory::new()),
            options,
        );
        let mode = tabbable.mode();

        actions.list.as_ref().unwrap().set_active(false);
        tabbable.list_button_toggled();
        assert!(!tabbable.sidebar_visible(Sidebar::List));
        assert!(tabbable.sidebar_visible(Sidebar::Strip));

        tabbable.strip_button_toggled();
        assert!(tabbable.sidebar_visible(Sidebar::Strip));

        // unbound action leaves the region as it is
        tabbable.showhide_sidebar(Sidebar::Props, false);
        tabbable.props_button_toggled();
        assert!(!tabbable.sidebar_visible(Sidebar::Props));

        assert_eq!(tabbable.mode(), mode);
    }

    #[test]
    fn test_tabbables_region_is_independent() {
        let mut fx = Fixture::new(true);
        fx.register();
        let before = fx.tabbable.snapshot();

        fx.tabbable
            .content_tabbables_region()
            .add(MockWidget::new_ref());
        assert_eq!(
            fx.tabbable
                .layout()
                .region(RegionKind::Tabbables)
                .children()
                .len(),
            1
        );
        assert_eq!(fx.tabbable.snapshot(), before);
    }

    #[test]
    fn test_state_round_trip_tabbed() {
        let mut fx = Fixture::new(true);
        fx.register();
        fx.tabbable.set_list_pane_divider(0.42);
        let node = fx.tabbable.get_state();

        assert_eq!(node.name, TABBABLE_NODE);
        assert_eq!(node.bool_property("tabbed"), Some(true));
        assert_eq!(node.property::<f32>("editor-listpane-pos"), Some(0.42));
        let window_node = node.child("Window").unwrap();
        assert_eq!(window_node.bool_property("tabbed"), Some(true));

        let mut restored = Fixture::new(false);
        restored.register();
        restored.tabbable.set_state(&node);

        assert!(restored.tabbable.tabbed_by_default());
        assert!(restored.tabbable.is_tabbed());
        assert_eq!(restored.tabbable.list_pane_divider(), 0.42);
    }

    #[test]
    fn test_restore_clamps_divider() {
        let mut fx = Fixture::new(true);
        fx.tabbable.set_list_pane_divider(0.9);
        assert_eq!(fx.tabbable.list_pane_divider(), 0.9);
        let node = fx.tabbable.get_state();

        let mut restored = Fixture::new(true);
        restored.tabbable.set_state(&node);
        assert_eq!(restored.tabbable.list_pane_divider(), 0.75);
    }

    #[test]
    fn test_list_pane_limit_never_exceeds_cap() {
        let mut fx = Fixture::new(true);
        fx.tabbable.set_list_pane_divider(0.9);
        let node = fx.tabbable.get_state();

        let tabbable = |max| {
            Tabbable::new(
                MockWidget::new_ref(),
                "Editor",
                "editor",
                Box::new(MockWindowFactory::new()),
                TabbableOptions {
                    max_list_pane_fraction: max,
                    ..TabbableOptions::default()
                },
            )
        };

        let mut loose = tabbable(0.95);
        loose.set_state(&node);
        assert_eq!(loose.list_pane_divider(), 0.75);

        let mut tight = tabbable(0.6);
        tight.set_state(&node);
        assert_eq!(tight.list_pane_divider(), 0.6);
    }

    #[test]
    fn test_restore_visible_window() {
        let mut fx = Fixture::new(true);
        fx.register();
        fx.tabbable.detach();
        fx.factory
            .window(0)
            .unwrap()
            .place(Point::new(50, 60), Size::new(700, 500));
        let node = fx.tabbable.get_state();

        let mut restored = Fixture::new(true);
        restored.register();
        let before = restored.event_count();
        restored.tabbable.set_state(&node);

        assert_eq!(restored.tabbable.mode(), TabbableMode::Windowed);
        assert!(!restored.tabbable.tabbed_by_default());
        let window = restored.factory.window(0).unwrap();
        assert!(window.is_visible());
        assert_eq!(window.position(), Point::new(50, 60));
        assert_eq!(restored.event_count(), before + 1);
        assert_eq!(restored.tabbed.lock().last(), Some(&false));
    }

    #[test]
    fn test_restore_visible_window_keeps_saved_size_over_allocation() {
        let mut fx = Fixture::new(true);
        fx.register();
        fx.tabbable.detach();
        fx.factory
            .window(0)
            .unwrap()
            .place(Point::new(30, 40), Size::new(500, 400));
        let node = fx.tabbable.get_state();

        let mut restored = Fixture::new(true);
        restored.host.write().set_allocation(Size::new(1000, 700));
        restored.register();
        assert!(restored.tabbable.is_tabbed());
        restored.tabbable.set_state(&node);

        assert_eq!(restored.tabbable.mode(), TabbableMode::Windowed);
        let window = restored.factory.window(0).unwrap();
        assert_eq!(window.position(), Point::new(30, 40));
        assert_eq!(window.size(), Size::new(500, 400));
    }

    #[test]
    fn test_restore_hidden_untabbed_releases_tab() {
        let mut node = StateNode::new(TABBABLE_NODE);
        let mut window_node = StateNode::new("Window");
        window_node.set_property("name", "editor");
        window_node.set_property("visible", false);
        window_node.set_property("tabbed", false);
        node.add_child(window_node);

        let mut fx = Fixture::new(true);
        fx.register();
        assert!(fx.tabbable.is_tabbed());
        let before = fx.event_count();

        fx.tabbable.set_state(&node);
        assert_eq!(fx.tabbable.mode(), TabbableMode::Unrealized);
        assert!(!fx.tabbable.tabbed_by_default());
        assert_eq!(fx.event_count(), before + 1);
        assert_eq!(fx.tabbed.lock().last(), Some(&false));
    }

    #[test]
    fn test_restore_is_idempotent() {
        let mut fx = Fixture::new(false);
        fx.register();
        fx.tabbable.detach();
        let windowed = fx.tabbable.get_state();

        let mut restored = Fixture::new(true);
        restored.register();
        restored.tabbable.set_state(&windowed);
        let first = restored.tabbable.snapshot();
        restored.tabbable.set_state(&windowed);
        assert_eq!(restored.tabbable.snapshot(), first);
        assert_eq!(restored.parent_count(), 1);
    }

    #[test]
    fn test_drop_destroys_window() {
        let mut fx = Fixture::new(false);
        fx.tabbable.detach();
        let window = fx.factory.window(0).unwrap();
        assert!(window.is_visible());

        drop(fx.tabbable);
        assert!(!window.is_visible());
    }
}
