//! Node Data Structures
//!
//! This module defines the `Node` record held by the node store together with
//! the payload types used to create and patch it.
//!
//! # Architecture
//!
//! - **Flat Arena**: Nodes live in a flat, id-indexed collection; the tree is
//!   encoded by `parent_id` and ordered `children` id lists
//! - **Store-Owned Links**: `id`, `parent_id` and `children` are only written by
//!   the store, never by payloads
//! - **Opaque Attributes**: `attributes` is a string map the store never inspects
//!
//! # Examples
//!
//! ```rust
//! use domtree_core::models::{NodeData, NodeUpdate};
//!
//! // Payload for a new <span> with some text
//! let data = NodeData::new("span").with_content("hello");
//!
//! // Patch that renames the tag and drops the content
//! let update = NodeUpdate::new()
//!     .with_node_type("p".to_string())
//!     .clear_content();
//! assert!(!update.is_empty());
//! # let _ = data;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// String key/value attributes attached to a node
pub type Attributes = BTreeMap<String, String>;

/// A single labeled element of the tree.
///
/// # Fields
///
/// - `id`: Unique identifier, generated on creation and never changed
/// - `node_type`: Free-text label such as a tag name (`"div"`, `"span"`)
/// - `parent_id`: Owning parent, `None` for a root-level node
/// - `children`: Ordered child ids; insertion order is display order
/// - `content`: Optional text body shown in the diagram
/// - `class_name`: Optional CSS-style class label
/// - `attributes`: Optional string map, opaque to the store
/// - `created_at` / `modified_at`: Timestamps maintained by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier (UUID, or a fixed id for seed nodes)
    pub id: String,

    /// Node type label (e.g., "root", "div", "span")
    pub node_type: String,

    /// Parent node ID (None for root-level nodes)
    pub parent_id: Option<String>,

    /// Child node IDs in display order
    #[serde(default)]
    pub children: Vec<String>,

    /// Optional text body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Optional class label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Optional opaque attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,
}

impl Node {
    /// Build a node with an explicit id (seed nodes use fixed ids)
    pub(crate) fn with_id(id: String, data: NodeData, parent_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            node_type: data.node_type,
            parent_id,
            children: Vec::new(),
            content: data.content,
            class_name: data.class_name,
            attributes: data.attributes,
            created_at: now,
            modified_at: now,
        }
    }

    /// Whether this node has no parent link
    pub fn is_root_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Apply a partial update, leaving `id`, `parent_id` and `children` alone.
    ///
    /// Returns `true` when at least one field was supplied.
    pub(crate) fn apply_update(&mut self, update: NodeUpdate) -> bool {
        if update.is_empty() {
            return false;
        }

        if let Some(node_type) = update.node_type {
            self.node_type = node_type;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(class_name) = update.class_name {
            self.class_name = class_name;
        }
        if let Some(attributes) = update.attributes {
            self.attributes = attributes;
        }

        self.modified_at = Utc::now();
        true
    }

    pub(crate) fn push_child(&mut self, child_id: String) {
        self.children.push(child_id);
        self.modified_at = Utc::now();
    }

    /// Keep only the child ids matching `keep`; returns whether any were dropped
    pub(crate) fn retain_children<F>(&mut self, keep: F) -> bool
    where
        F: FnMut(&String) -> bool,
    {
        let before = self.children.len();
        self.children.retain(keep);
        let detached = self.children.len() != before;
        if detached {
            self.modified_at = Utc::now();
        }
        detached
    }
}

/// Payload for creating a node.
///
/// Carries only the user-editable fields; the store assigns `id`, `parent_id`
/// and `children`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Node type label
    pub node_type: String,

    /// Optional text body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Optional class label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Optional attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl NodeData {
    /// Create a payload with just a node type
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    /// Set the text body
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the class label
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Add a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Custom deserializer for optional fields that accepts both plain values and nulls
///
/// Maps three input formats to the double-Option pattern:
/// - Missing field → None (don't update)
/// - null → Some(None) (clear)
/// - "value" → Some(Some("value")) (set to value)
fn deserialize_optional_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// Partial node update.
///
/// Only supplied fields are written. There is no field for
/// `id`, `parent_id` or `children`.
///
/// # Double-Option Pattern for Optional Fields
///
/// - `None`: Don't change this field
/// - `Some(None)`: Clear the field
/// - `Some(Some(value))`: Set the field to `value`
///
/// # Examples
///
/// ```rust
/// # use domtree_core::models::NodeUpdate;
/// // Update only content
/// let update = NodeUpdate {
///     content: Some(Some("Updated".to_string())),
///     ..Default::default()
/// };
///
/// // Drop the class label, keep everything else
/// let update = NodeUpdate {
///     class_name: Some(None),
///     ..Default::default()
/// };
/// # let _ = update;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    /// Update node type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    /// Update or clear content
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub content: Option<Option<String>>,

    /// Update or clear class label
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub class_name: Option<Option<String>>,

    /// Replace or clear the attribute map
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub attributes: Option<Option<Attributes>>,
}

impl NodeUpdate {
    /// Create a new empty NodeUpdate
    pub fn new() -> Self {
        Self::default()
    }

    /// Set node type update
    pub fn with_node_type(mut self, node_type: String) -> Self {
        self.node_type = Some(node_type);
        self
    }

    /// Set content update
    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(Some(content));
        self
    }

    /// Clear content
    pub fn clear_content(mut self) -> Self {
        self.content = Some(None);
        self
    }

    /// Set class label update
    pub fn with_class_name(mut self, class_name: String) -> Self {
        self.class_name = Some(Some(class_name));
        self
    }

    /// Replace the attribute map
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(Some(attributes));
        self
    }

    /// Check if update contains any changes
    pub fn is_empty(&self) -> bool {
        self.node_type.is_none()
            && self.content.is_none()
            && self.class_name.is_none()
            && self.attributes.is_none()
    }
}
