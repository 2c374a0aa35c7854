//! Saved state record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabdock_storage::StateRow;
use tabdock_tabs::{StateNode, WINDOW_NODE};

use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedState {
    /// Untranslated Tabbable name
    pub name: String,
    /// The record produced by `Tabbable::get_state`
    pub node: StateNode,
    /// Last time the record was written
    pub updated_at: DateTime<Utc>,
}

impl SavedState {
    pub fn new(name: String, node: StateNode) -> Self {
        Self {
            name,
            node,
            updated_at: Utc::now(),
        }
    }

    /// Replace the node, bumping the timestamp only when it changed.
    pub fn update(&mut self, node: StateNode) -> bool {
        if self.node == node {
            return false;
        }
        self.node = node;
        self.updated_at = Utc::now();
        true
    }

    /// Decode a stored row.
    pub fn from_row(row: &StateRow) -> Result<Self> {
        Ok(Self {
            name: row.name.clone(),
            node: StateNode::from_json(&row.node)?,
            updated_at: row.updated_at,
        })
    }

    pub fn to_row(&self) -> Result<StateRow> {
        Ok(StateRow {
            name: self.name.clone(),
            node: self.node.to_json()?,
            updated_at: self.updated_at,
        })
    }

    /// Requested mode recorded in the node, if any.
    pub fn tabbed(&self) -> Option<bool> {
        self.node
            .child(WINDOW_NODE)
            .and_then(|w| w.bool_property("tabbed"))
            .or_else(|| self.node.bool_property("tabbed"))
    }
}
