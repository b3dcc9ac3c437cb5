//! Visible confirmation of the last heartbeat.
//!
//! The WebSocket variant mirrors every timestamp it sends into a UI element
//! (id [`PING_ELEMENT_ID`](crate::types::constants::PING_ELEMENT_ID)) so a
//! human can see the page is still beating.

use std::collections::HashMap;
use std::sync::RwLock;

/// Anything that can show text in an element addressed by id.
pub trait StatusDisplay: Send + Sync {
    fn set_text(&self, element_id: &str, text: &str);
}

/// In-memory element table, readable by whatever renders the UI.
#[derive(Debug, Default)]
pub struct ElementDisplay {
    elements: RwLock<HashMap<String, String>>,
}

impl ElementDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of an element, if it was ever set
    pub fn text(&self, element_id: &str) -> Option<String> {
        let elements = self
            .elements
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        elements.get(element_id).cloned()
    }
}

impl StatusDisplay for ElementDisplay {
    fn set_text(&self, element_id: &str, text: &str) {
        let mut elements = self
            .elements
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        elements.insert(element_id.to_string(), text.to_string());
    }
}
