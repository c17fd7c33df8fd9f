//! Store Events
//!
//! Events emitted by `NodeStore` after each committed state transition. They
//! follow the observer pattern so consumers (diagram, list view, edit form)
//! can re-render without polling the store.
//!
//! # Event Flow
//!
//! 1. A store operation computes and commits the new state
//! 2. Exactly one event describing the transition is sent on a broadcast channel
//! 3. Subscribers pick it up with `try_recv()` or `recv().await`
//!
//! No-op operations (unknown ids, empty updates) emit nothing.

use crate::models::Node;
use serde::{Deserialize, Serialize};

/// Events emitted by the node store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreEvent {
    /// A node was added (its parent, if any, gained it as last child)
    #[serde(rename = "node:created")]
    NodeCreated { node: Node },

    /// Fields of an existing node changed
    #[serde(rename = "node:updated")]
    NodeUpdated { node: Node },

    /// A node and its descendants were removed
    #[serde(rename = "nodes:removed", rename_all = "camelCase")]
    NodesRemoved {
        /// Every removed id, root of the removed subtree first
        ids: Vec<String>,
        /// Whether the selection cursor was cleared by this removal
        selection_cleared: bool,
    },

    /// The collection was reset to its seed and selection cleared
    #[serde(rename = "nodes:cleared")]
    NodesCleared,

    /// The selection cursor moved
    #[serde(rename = "selection:changed")]
    SelectionChanged { id: Option<String> },
}

impl StoreEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            StoreEvent::NodeCreated { .. } => "node:created",
            StoreEvent::NodeUpdated { .. } => "node:updated",
            StoreEvent::NodesRemoved { .. } => "nodes:removed",
            StoreEvent::NodesCleared => "nodes:cleared",
            StoreEvent::SelectionChanged { .. } => "selection:changed",
        }
    }

    /// Whether the event changes the node collection (as opposed to selection only)
    pub fn touches_nodes(&self) -> bool {
        !matches!(self, StoreEvent::SelectionChanged { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The JSON shape is internally tagged: `type` sits next to the payload fields.
    #[test]
    fn test_store_event_serialization_contract() {
        let event = StoreEvent::NodesRemoved {
            ids: vec!["a".to_string(), "b".to_string()],
            selection_cleared: true,
        };

        let parsed = serde_json::to_value(&event).unwrap();

        assert_eq!(parsed["type"], "nodes:removed");
        assert_eq!(parsed["ids"][1], "b");
        assert_eq!(parsed["selectionCleared"], true);
        assert_eq!(parsed["type"], event.event_type());

        let selection = serde_json::to_value(StoreEvent::SelectionChanged { id: None }).unwrap();
        assert_eq!(selection["type"], "selection:changed");
        assert!(selection["id"].is_null());
    }

    #[test]
    fn test_touches_nodes() {
        assert!(StoreEvent::NodesCleared.touches_nodes());
        assert!(!StoreEvent::SelectionChanged {
            id: Some("x".to_string())
        }
        .touches_nodes());
    }
}
