//! State Store
//!
//! Write-through cache of Tabbable state records.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use tabdock_storage::Database;
use tabdock_tabs::StateNode;

use crate::error::SessionError;
use crate::saved::SavedState;
use crate::Result;

/// Root node name of an exported document.
pub const DOCUMENT_NODE: &str = "UI";

pub struct StateStore {
    /// In-memory cache keyed by Tabbable name
    states: Arc<RwLock<HashMap<String, SavedState>>>,
    /// Database for persistence
    db: Database,
}

impl StateStore {
    pub fn new(db: Database) -> Self {
        Self {
            states: Arc::new(RwLock::new(HashMap::new())),
            db,
        }
    }

    /// Load every saved record into the cache. Rows that fail to decode are
    /// skipped so one corrupt record cannot hide the others.
    pub fn load_all(&self) -> Result<usize> {
        let rows = self.db.state_rows()?;

        let mut loaded = Vec::with_capacity(rows.len());
        for row in rows {
            match SavedState::from_row(&row) {
                Ok(state) => loaded.push(state),
                Err(e) => {
                    tracing::warn!(name = %row.name, error = %e, "Skipping unreadable saved state");
                }
            }
        }

        let count = loaded.len();
        {
            let mut cache = self.states.write();
            for state in loaded {
                cache.insert(state.name.clone(), state);
            }
        }

        tracing::info!(count, "Loaded saved tabbable state");

        Ok(count)
    }

    /// Save the record for `name`. Unchanged records are not rewritten.
    pub fn save(&self, name: &str, node: &StateNode) -> Result<SavedState> {
        if name.trim().is_empty() {
            return Err(SessionError::EmptyName);
        }

        let existing = self.states.read().get(name).cloned();
        let (state, changed) = match existing {
            Some(mut state) => {
                let changed = state.update(node.clone());
                (state, changed)
            }
            None => (SavedState::new(name.to_string(), node.clone()), true),
        };

        if changed {
            self.write_state(&state)?;
            tracing::debug!(name = %name, "Saved tabbable state");
        }

        Ok(state)
    }

    pub fn get(&self, name: &str) -> Result<SavedState> {
        self.states
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(name.to_string()))
    }

    pub fn load(&self, name: &str) -> Option<StateNode> {
        self.states.read().get(name).map(|s| s.node.clone())
    }

    /// All records, ordered by name.
    pub fn list(&self) -> Vec<SavedState> {
        let mut states: Vec<SavedState> = self.states.read().values().cloned().collect();
        states.sort_by(|a, b| a.name.cmp(&b.name));
        states
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let deleted = self.db.delete_state(name)?;
        let cached = self.states.write().remove(name).is_some();
        if !deleted && !cached {
            return Err(SessionError::NotFound(name.to_string()));
        }

        tracing::info!(name = %name, "Removed saved tabbable state");

        Ok(())
    }

    /// One document holding every record, as children of a `UI` node.
    pub fn export_document(&self) -> StateNode {
        let mut root = StateNode::new(DOCUMENT_NODE);
        for state in self.list() {
            root.add_child(state.node);
        }
        root
    }

    /// Replace records with those found in `document`. Children without a
    /// `name` property are ignored.
    pub fn import_document(&self, document: &StateNode) -> Result<usize> {
        if document.name != DOCUMENT_NODE {
            return Err(SessionError::MalformedDocument(format!(
                "expected root node {DOCUMENT_NODE}, found {}",
                document.name
            )));
        }

        let mut states = Vec::new();
        for child in &document.children {
            match child.raw_property("name") {
                Some(name) if !name.trim().is_empty() => {
                    states.push(SavedState::new(name.to_string(), child.clone()));
                }
                _ => tracing::warn!(node = %child.name, "Ignoring unnamed state record"),
            }
        }

        let rows = states
            .iter()
            .map(SavedState::to_row)
            .collect::<Result<Vec<_>>>()?;
        self.db.write_states(&rows)?;

        let count = states.len();
        {
            let mut cache = self.states.write();
            for state in states {
                cache.insert(state.name.clone(), state);
            }
        }

        tracing::info!(count, "Imported tabbable state document");

        Ok(count)
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_document())?)
    }

    pub fn import_json(&self, json: &str) -> Result<usize> {
        let document = StateNode::from_json(json)?;
        self.import_document(&document)
    }

    /// Write one record to the database and the cache.
    fn write_state(&self, state: &SavedState) -> Result<()> {
        self.db.write_state(&state.to_row()?)?;

        self.states
            .write()
            .insert(state.name.clone(), state.clone());

        Ok(())
    }
}

impl Clone for StateStore {
    fn clone(&self) -> Self {
        Self {
            states: Arc::clone(&self.states),
            db: self.db.clone(),
        }
    }
}
