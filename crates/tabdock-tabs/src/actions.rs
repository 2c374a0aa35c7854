//! Boolean toggle actions bound to the sidebar buttons
//!
//! Actions are handed to a Tabbable once, at construction, instead of being
//! looked up by name when a button fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ToggleAction {
    name: Arc<str>,
    active: Arc<AtomicBool>,
}

impl ToggleAction {
    pub fn new(name: &str, active: bool) -> Self {
        Self {
            name: Arc::from(name),
            active: Arc::new(AtomicBool::new(active)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    /// Flip the state and return the new value.
    pub fn toggle(&self) -> bool {
        !self.active.fetch_xor(true, Ordering::Relaxed)
    }
}

/// The three sidebar toggles. Unbound slots leave their region alone.
#[derive(Debug, Clone, Default)]
pub struct SidebarActions {
    pub strip: Option<ToggleAction>,
    pub list: Option<ToggleAction>,
    pub props: Option<ToggleAction>,
}

impl SidebarActions {
    /// Bind all three toggles, named `<prefix>-toggle-{strip,list,props}`.
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            strip: Some(ToggleAction::new(&format!("{prefix}-toggle-strip"), true)),
            list: Some(ToggleAction::new(&format!("{prefix}-toggle-list"), true)),
            props: Some(ToggleAction::new(&format!("{prefix}-toggle-props"), true)),
        }
    }
}
