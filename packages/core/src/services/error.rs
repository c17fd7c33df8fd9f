//! Service Layer Error Types
//!
//! Errors surfaced by the strict (`try_*`) store operations. The permissive
//! operations log these and leave state unchanged instead.

use thiserror::Error;

/// Node store operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeStoreError {
    /// Node not found by ID
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// Parent reference does not resolve to a node
    #[error("Parent node not found: {parent_id}")]
    ParentNotFound { parent_id: String },

    /// Attempt to remove the designated root node
    #[error("Root node '{id}' is protected and cannot be removed")]
    ProtectedRoot { id: String },

    /// Configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NodeStoreError {
    /// Create a node not found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create a parent not found error
    pub fn parent_not_found(parent_id: impl Into<String>) -> Self {
        Self::ParentNotFound {
            parent_id: parent_id.into(),
        }
    }

    /// Create a protected root error
    pub fn protected_root(id: impl Into<String>) -> Self {
        Self::ProtectedRoot { id: id.into() }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error is a dangling reference (node or parent missing)
    pub fn is_reference_not_found(&self) -> bool {
        matches!(
            self,
            Self::NodeNotFound { .. } | Self::ParentNotFound { .. }
        )
    }
}
