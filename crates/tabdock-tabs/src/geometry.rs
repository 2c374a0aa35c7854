//! Window geometry and divider positions remembered across restarts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::node::StateNode;

/// Largest list-pane divider fraction accepted on restore. Anything larger
/// leaves the main content area too small to use.
pub const MAX_LIST_PANE_FRACTION: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            width: (self.width as f32 * factor).round() as i32,
            height: (self.height as f32 * factor).round() as i32,
        }
    }
}

/// Last known window placement plus named divider fractions.
///
/// Pure data: it is filled from and written to a [`StateNode`] by its owner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryStore {
    pub visible: bool,
    pub position: Option<Point>,
    pub size: Option<Size>,
    dividers: BTreeMap<String, f32>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&mut self, position: Point, size: Size) {
        self.position = Some(position);
        if !size.is_empty() {
            self.size = Some(size);
        }
    }

    pub fn divider(&self, name: &str) -> Option<f32> {
        self.dividers.get(name).copied()
    }

    pub fn set_divider(&mut self, name: impl Into<String>, fraction: f32) {
        self.dividers.insert(name.into(), clamp_fraction(fraction, 1.0));
    }

    /// Write placement properties (`visible`, `x`, `y`, `w`, `h`) and every
    /// divider onto `node`.
    pub fn write_to(&self, node: &mut StateNode) {
        node.set_property("visible", self.visible);
        if let Some(pos) = self.position {
            node.set_property("x", pos.x);
            node.set_property("y", pos.y);
        }
        if let Some(size) = self.size {
            node.set_property("w", size.width);
            node.set_property("h", size.height);
        }
        for (name, fraction) in &self.dividers {
            node.set_property(name, fraction);
        }
    }

    /// Read placement properties from `node`. Missing or unparsable values
    /// leave the current ones in place.
    pub fn read_from(&mut self, node: &StateNode) {
        if let Some(visible) = node.bool_property("visible") {
            self.visible = visible;
        }

        if let (Some(x), Some(y)) = (node.property::<i32>("x"), node.property::<i32>("y")) {
            self.position = Some(Point::new(x, y));
        }

        if let (Some(w), Some(h)) = (node.property::<i32>("w"), node.property::<i32>("h")) {
            let size = Size::new(w, h);
            if size.is_empty() {
                tracing::warn!(width = w, height = h, "Ignoring empty saved window size");
            } else {
                self.size = Some(size);
            }
        }
    }

    /// Read one divider fraction, clamped to `[0, max]`.
    pub fn read_divider(&mut self, node: &StateNode, name: &str, max: f32) -> Option<f32> {
        let raw = node.property::<f32>(name)?;
        let fraction = clamp_fraction(raw, max);
        if fraction != raw {
            tracing::warn!(divider = name, saved = raw, restored = fraction, "Clamped divider fraction");
        }
        self.dividers.insert(name.to_string(), fraction);
        Some(fraction)
    }
}

pub(crate) fn clamp_fraction(fraction: f32, max: f32) -> f32 {
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_round_trip() {
        let mut store = GeometryStore::new();
        store.visible = true;
        store.remember(Point::new(10, 20), Size::new(640, 480));

        let mut node = StateNode::new("Window");
        store.write_to(&mut node);

        let mut restored = GeometryStore::new();
        restored.read_from(&node);
        assert!(restored.visible);
        assert_eq!(restored.position, Some(Point::new(10, 20)));
        assert_eq!(restored.size, Some(Size::new(640, 480)));
    }

    #[test]
    fn test_divider_clamped_on_read() {
        let mut node = StateNode::new("Window");
        node.set_property("editor-listpane-pos", 0.9f32);

        let mut store = GeometryStore::new();
        let fraction = store
            .read_divider(&node, "editor-listpane-pos", MAX_LIST_PANE_FRACTION)
            .unwrap();
        assert_eq!(fraction, 0.75);
        assert_eq!(store.divider("editor-listpane-pos"), Some(0.75));
    }

    #[test]
    fn test_negative_divider_clamped_to_zero() {
        let mut node = StateNode::new("Window");
        node.set_property("mixer-listpane-pos", -0.2f32);

        let mut store = GeometryStore::new();
        assert_eq!(
            store.read_divider(&node, "mixer-listpane-pos", MAX_LIST_PANE_FRACTION),
            Some(0.0)
        );
    }

    #[test]
    fn test_empty_size_ignored() {
        let mut node = StateNode::new("Window");
        node.set_property("w", 0);
        node.set_property("h", 300);

        let mut store = GeometryStore::new();
        store.read_from(&node);
        assert_eq!(store.size, None);
    }
}
