//! Tabbable attachment modes
//!
//! ```text
//! Unrealized
//!   ↓ attach           ↓ detach
//! Tabbed  ◀──attach── Windowed
//!   └──────detach──────▶
//! ```
//!
//! The mode is never stored: it is read off the content's current parent.
//! `Unrealized` covers both "never placed" and "tab hidden, no parent".

use serde::{Deserialize, Serialize};

use crate::error::TabError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabbableMode {
    /// Content has no parent
    Unrealized,
    /// Content is a page of the registered dock host
    Tabbed,
    /// Content lives in the Tabbable's own window
    Windowed,
}

impl TabbableMode {
    /// Check whether a public operation may move the content from `self` to `target`.
    pub fn can_transition_to(&self, target: TabbableMode) -> bool {
        match (self, target) {
            // attach
            (TabbableMode::Unrealized, TabbableMode::Tabbed) => true,
            (TabbableMode::Windowed, TabbableMode::Tabbed) => true,
            // detach is valid from anywhere
            (_, TabbableMode::Windowed) => true,
            // hiding a tab, or dropping it on the desktop, releases the content
            (TabbableMode::Tabbed, TabbableMode::Unrealized) => true,
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    pub fn is_tabbed(&self) -> bool {
        matches!(self, TabbableMode::Tabbed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabbableMode::Unrealized => "unrealized",
            TabbableMode::Tabbed => "tabbed",
            TabbableMode::Windowed => "windowed",
        }
    }
}

impl std::fmt::Display for TabbableMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TabbableMode {
    type Err = TabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unrealized" => Ok(TabbableMode::Unrealized),
            "tabbed" => Ok(TabbableMode::Tabbed),
            "windowed" => Ok(TabbableMode::Windowed),
            _ => Err(TabError::UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(TabbableMode::Unrealized.can_transition_to(TabbableMode::Tabbed));
        assert!(TabbableMode::Unrealized.can_transition_to(TabbableMode::Windowed));
        assert!(TabbableMode::Tabbed.can_transition_to(TabbableMode::Windowed));
        assert!(TabbableMode::Windowed.can_transition_to(TabbableMode::Tabbed));
        assert!(TabbableMode::Tabbed.can_transition_to(TabbableMode::Unrealized));
    }

    #[test]
    fn test_invalid_transitions() {
        // A windowed Tabbable only hides its window; the content stays packed
        assert!(!TabbableMode::Windowed.can_transition_to(TabbableMode::Unrealized));
    }

    #[test]
    fn test_parse_round_trip() {
        for mode in [
            TabbableMode::Unrealized,
            TabbableMode::Tabbed,
            TabbableMode::Windowed,
        ] {
            assert_eq!(mode.as_str().parse::<TabbableMode>().unwrap(), mode);
        }
        assert!("floating".parse::<TabbableMode>().is_err());
    }
}
