//! Configuration for the node store
use serde::{Deserialize, Serialize};

use crate::services::NodeStoreError;

/// Id of the node that anchors the display tree
pub const DEFAULT_ROOT_ID: &str = "root-node";

/// Broadcast channel capacity for store events.
///
/// Lagging receivers drop the oldest events; consumers only track current state.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Id of the designated root node (seeded on construction and on clear)
    pub root_id: String,

    /// Refuse to remove the designated root node
    pub protect_root: bool,

    /// Capacity of the event broadcast channel
    pub event_channel_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_string(),
            protect_root: true,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Override the root id
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    /// Enable or disable root protection
    pub fn with_protect_root(mut self, protect_root: bool) -> Self {
        self.protect_root = protect_root;
        self
    }

    /// Override the event channel capacity
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), NodeStoreError> {
        if self.root_id.trim().is_empty() {
            return Err(NodeStoreError::invalid_config("root_id cannot be empty"));
        }

        // Seed children use fixed ids; the root must not shadow them.
        if crate::services::node_store::SEED_CHILD_IDS.contains(&self.root_id.as_str()) {
            return Err(NodeStoreError::invalid_config(format!(
                "root_id '{}' collides with a seed child id",
                self.root_id
            )));
        }

        // tokio's broadcast channel panics on zero capacity
        if self.event_channel_capacity == 0 {
            return Err(NodeStoreError::invalid_config(
                "event_channel_capacity must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = StoreConfig::default();
        assert_eq!(config.root_id, "root-node");
        assert!(config.protect_root);
        assert_eq!(config.event_channel_capacity, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(StoreConfig::default().with_root_id("  ").validate().is_err());
        assert!(StoreConfig::default().with_root_id("child-1").validate().is_err());
        assert!(StoreConfig::default()
            .with_event_channel_capacity(0)
            .validate()
            .is_err());
        assert!(StoreConfig::default().with_root_id("html").validate().is_ok());
    }
}
