//! Generic persisted state record
//!
//! A named record of string properties with nested children. The on-disk
//! encoding belongs to whoever stores it; JSON helpers are provided for the
//! common case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateNode {
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<StateNode>,
}

impl StateNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn set_property<T: ToString>(&mut self, key: impl Into<String>, value: T) {
        self.properties.insert(key.into(), value.to_string());
    }

    pub fn raw_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Parse a property, treating unparsable values as absent.
    pub fn property<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.properties.get(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(node = %self.name, key, value = %raw, "Ignoring unparsable property");
                None
            }
        }
    }

    /// Booleans are accepted in the spellings older state files used.
    pub fn bool_property(&self, key: &str) -> Option<bool> {
        let raw = self.properties.get(key)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "y" => Some(true),
            "0" | "false" | "no" | "n" => Some(false),
            _ => {
                tracing::warn!(node = %self.name, key, value = %raw, "Ignoring unparsable boolean");
                None
            }
        }
    }

    pub fn add_child(&mut self, child: StateNode) {
        self.children.push(child);
    }

    pub fn child(&self, name: &str) -> Option<&StateNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First child called `name` whose property `key` equals `value`.
    pub fn child_with(&self, name: &str, key: &str, value: &str) -> Option<&StateNode> {
        self.children
            .iter()
            .find(|c| c.name == name && c.raw_property(key) == Some(value))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
