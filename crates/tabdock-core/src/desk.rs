//! Desk: the set of Tabbables sharing one dock notebook
//!
//! The desk owns every registered Tabbable, wires its state changes into
//! dirty tracking and writes the records through the session store.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use tabdock_session::StateStore;
use tabdock_storage::Database;
use tabdock_tabs::{
    Connection, SharedDockHost, StateNode, Tabbable, TabbableMode, WidgetRef, WindowEvent,
    WindowFactory,
};

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

/// Settings key holding the name of the selected dock page.
const CURRENT_TAB_KEY: &str = "current-tab";

struct Entry {
    tabbable: Tabbable,
    /// Keeps the dirty-tracking slot connected
    _state_change: Connection,
}

pub struct Desk {
    config: Config,
    db: Database,
    store: StateStore,
    dock_host: SharedDockHost,
    /// Registration order
    entries: Vec<Entry>,
    /// Names whose state changed since they were last saved
    dirty: Arc<Mutex<HashSet<String>>>,
}

impl Desk {
    /// Open the database named by `config` and load the saved records.
    pub fn new(mut config: Config, dock_host: SharedDockHost) -> Result<Self> {
        config.validate()?;
        let db = Database::open(&config.database_path)?;
        Self::with_database(config, db, dock_host)
    }

    pub fn open_in_memory(mut config: Config, dock_host: SharedDockHost) -> Result<Self> {
        config.validate()?;
        let db = Database::open_in_memory()?;
        Self::with_database(config, db, dock_host)
    }

    pub fn with_database(config: Config, db: Database, dock_host: SharedDockHost) -> Result<Self> {
        let store = StateStore::new(db.clone());
        store.load_all()?;

        tracing::info!(autosave = config.autosave, "Desk initialized");

        Ok(Self {
            config,
            db,
            store,
            dock_host,
            entries: Vec::new(),
            dirty: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn dock_host(&self) -> &SharedDockHost {
        &self.dock_host
    }

    // === Registration ===

    /// Build a Tabbable with the configured options and register it.
    pub fn create(
        &mut self,
        contents: WidgetRef,
        title: &str,
        name: &str,
        factory: Box<dyn WindowFactory>,
    ) -> Result<&mut Tabbable> {
        let tabbable = Tabbable::new(contents, title, name, factory, self.config.tabbable_options());
        self.add(tabbable)
    }

    /// Register `tabbable` with the dock host and apply its saved record,
    /// if there is one.
    pub fn add(&mut self, mut tabbable: Tabbable) -> Result<&mut Tabbable> {
        let name = tabbable.name().to_string();
        if self.position(&name).is_some() {
            return Err(CoreError::DuplicateTabbable(name));
        }

        let dirty = Arc::clone(&self.dirty);
        let connection = tabbable.state_change().connect(move |snapshot| {
            dirty.lock().insert(snapshot.name.clone());
        });

        tabbable.add_to_notebook(&self.dock_host);
        if let Some(node) = self.store.load(&name) {
            tabbable.set_state(&node);
        }

        tracing::info!(name = %name, mode = %tabbable.mode(), "Registered tabbable");

        self.entries.push(Entry {
            tabbable,
            _state_change: connection,
        });
        self.autosave()?;

        let index = self.entries.len() - 1;
        Ok(&mut self.entries[index].tabbable)
    }

    /// Unregister `name`: its tab is hidden and its own window destroyed.
    /// The saved record is kept.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let index = self
            .position(name)
            .ok_or_else(|| CoreError::UnknownTabbable(name.to_string()))?;

        self.autosave()?;

        let mut entry = self.entries.remove(index);
        entry.tabbable.make_invisible();
        drop(entry);

        self.dirty.lock().remove(name);

        tracing::info!(name = %name, "Removed tabbable");

        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Tabbable> {
        self.entries
            .iter()
            .find(|e| e.tabbable.name() == name)
            .map(|e| &e.tabbable)
            .ok_or_else(|| CoreError::UnknownTabbable(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Tabbable> {
        self.entries
            .iter_mut()
            .find(|e| e.tabbable.name() == name)
            .map(|e| &mut e.tabbable)
            .ok_or_else(|| CoreError::UnknownTabbable(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.tabbable.name()).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.tabbable.name() == name)
    }

    /// Name of the Tabbable whose page the dock host has selected.
    pub fn current_tab(&self) -> Option<&str> {
        let host = self.dock_host.read();
        let current = host.current_page()?;
        self.entries
            .iter()
            .find(|e| host.page_index_of(e.tabbable.contents().id()) == Some(current))
            .map(|e| e.tabbable.name())
    }

    // === Operations ===

    /// The tab-switcher action: bring `name` to the user's attention.
    pub fn show(&mut self, name: &str) -> Result<()> {
        self.apply(name, Tabbable::make_visible)
    }

    pub fn hide(&mut self, name: &str) -> Result<()> {
        self.apply(name, Tabbable::make_invisible)
    }

    /// Hide `name` if the user can see it, show it otherwise.
    pub fn toggle(&mut self, name: &str) -> Result<()> {
        self.apply(name, |tabbable| {
            let shown = match tabbable.mode() {
                TabbableMode::Tabbed => true,
                TabbableMode::Windowed => tabbable.window_visible(),
                TabbableMode::Unrealized => false,
            };
            if shown {
                tabbable.make_invisible();
            } else {
                tabbable.make_visible();
            }
        })
    }

    pub fn attach(&mut self, name: &str) -> Result<()> {
        self.apply(name, Tabbable::attach)
    }

    pub fn detach(&mut self, name: &str) -> Result<()> {
        self.apply(name, Tabbable::detach)
    }

    /// Route a window-manager notification to the owner of the window.
    pub fn handle_window_event(&mut self, name: &str, event: WindowEvent) -> Result<()> {
        self.apply(name, |tabbable| tabbable.handle_window_event(event))
    }

    fn apply<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Tabbable),
    {
        f(self.get_mut(name)?);
        self.autosave()
    }

    // === Persistence ===

    /// Names with unsaved state changes, sorted.
    pub fn dirty_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dirty.lock().iter().cloned().collect();
        names.sort();
        names
    }

    /// Save every dirty Tabbable. Returns how many records were written.
    /// A name stays dirty until its record has been written.
    pub fn save_dirty(&self) -> Result<usize> {
        let mut saved = 0;
        for name in self.dirty_names() {
            if let Ok(tabbable) = self.get(&name) {
                self.store.save(&name, &tabbable.get_state())?;
                saved += 1;
            }
            self.dirty.lock().remove(&name);
        }
        Ok(saved)
    }

    pub fn save_all(&self) -> Result<usize> {
        for entry in &self.entries {
            let tabbable = &entry.tabbable;
            self.store.save(tabbable.name(), &tabbable.get_state())?;
        }
        self.dirty.lock().clear();

        if let Some(current) = self.current_tab() {
            self.db.set_setting(CURRENT_TAB_KEY, current)?;
        }

        tracing::info!(count = self.entries.len(), "Saved all tabbables");

        Ok(self.entries.len())
    }

    /// Reload the store and apply each saved record to its Tabbable.
    pub fn restore_all(&mut self) -> Result<usize> {
        self.store.load_all()?;

        let mut restored = Vec::new();
        for entry in &mut self.entries {
            let name = entry.tabbable.name().to_string();
            if let Some(node) = self.store.load(&name) {
                entry.tabbable.set_state(&node);
                restored.push(name);
            }
        }

        {
            let mut dirty = self.dirty.lock();
            for name in &restored {
                dirty.remove(name);
            }
        }

        if let Some(current) = self.db.setting(CURRENT_TAB_KEY)? {
            self.select_tab(&current);
        }

        tracing::info!(count = restored.len(), "Restored tabbables");

        Ok(restored.len())
    }

    /// One `UI` document holding the current state of every Tabbable.
    pub fn export_document(&self) -> Result<StateNode> {
        self.save_all()?;
        Ok(self.store.export_document())
    }

    /// Store the records of `document` and apply them.
    pub fn import_document(&mut self, document: &StateNode) -> Result<usize> {
        self.store.import_document(document)?;
        self.restore_all()
    }

    fn select_tab(&self, name: &str) {
        let Ok(tabbable) = self.get(name) else {
            return;
        };
        let mut host = self.dock_host.write();
        if let Some(index) = host.page_index_of(tabbable.contents().id()) {
            host.set_current_page(index);
        }
    }

    fn autosave(&self) -> Result<()> {
        if self.config.autosave {
            self.save_dirty()?;
        }
        Ok(())
    }
}
