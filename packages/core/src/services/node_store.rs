//! Node Store - Canonical Tree State
//!
//! This module provides the state container every consumer reads from and
//! writes through:
//!
//! - CRUD operations (add, update, remove with cascade, clear)
//! - Selection cursor (set, resolve, form mode)
//! - Queries (lookup by id, ordered snapshot, descendant closure)
//! - Tree reconstruction for diagram renderers
//! - Store events for re-rendering
//!
//! # Transitions
//!
//! Every mutation takes `&mut self`, computes the complete new state and
//! commits it before emitting a single `StoreEvent`. No consumer can observe a
//! half-applied change (e.g. a child id appended to its parent while the child
//! record is still missing).
//!
//! # Missing References
//!
//! The permissive operations (`add_node`, `update_node`, `remove_node`) treat
//! an unknown id as a no-op and log a warning. The `try_*` variants return a
//! typed `NodeStoreError` instead.

use crate::config::StoreConfig;
use crate::events::StoreEvent;
use crate::models::{Node, NodeData, NodeUpdate, TreeNode};
use crate::services::error::NodeStoreError;
use crate::services::tree_builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Fixed ids of the two default children in the seed collection
pub const SEED_CHILD_IDS: [&str; 2] = ["child-1", "child-2"];

/// Node type of the seeded root node
pub const SEED_ROOT_TYPE: &str = "root";

/// Node type of the seeded default children
pub const SEED_CHILD_TYPE: &str = "div";

/// Build the seed collection: one root plus two default children.
fn seed_nodes(root_id: &str) -> IndexMap<String, Node> {
    let mut root = Node::with_id(root_id.to_string(), NodeData::new(SEED_ROOT_TYPE), None);

    let mut nodes = IndexMap::with_capacity(1 + SEED_CHILD_IDS.len());
    let mut children = Vec::with_capacity(SEED_CHILD_IDS.len());
    for child_id in SEED_CHILD_IDS {
        root.children.push(child_id.to_string());
        children.push(Node::with_id(
            child_id.to_string(),
            NodeData::new(SEED_CHILD_TYPE),
            Some(root_id.to_string()),
        ));
    }

    nodes.insert(root.id.clone(), root);
    for child in children {
        nodes.insert(child.id.clone(), child);
    }
    nodes
}

/// Result of a remove operation
///
/// Always produced (the permissive remove never fails), but reports what
/// actually happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResult {
    /// Ids removed, target first, in depth-first order
    pub removed: Vec<String>,

    /// Whether the selection cursor was cleared
    pub selection_cleared: bool,
}

impl RemoveResult {
    /// Whether anything was removed
    pub fn existed(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// Owned, serializable copy of the store state handed to consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// All nodes in insertion order
    pub nodes: Vec<Node>,

    /// Current selection cursor
    pub selected_node_id: Option<String>,
}

/// Mode of the edit form, derived from the selection cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormMode<'a> {
    /// Nothing resolves for the selection: the form creates new nodes
    Create,
    /// The selection resolves: the form edits this node
    Update(&'a Node),
}

/// The canonical node collection and selection cursor.
///
/// Construct one per view and pass it to consumers explicitly; there is no
/// global instance.
///
/// # Examples
///
/// ```rust
/// use domtree_core::models::NodeData;
/// use domtree_core::services::NodeStore;
///
/// let mut store = NodeStore::new();
/// assert_eq!(store.len(), 3);
///
/// let id = store.add_node(NodeData::new("span"), Some("child-1")).unwrap();
/// assert_eq!(store.get_node_by_id("child-1").unwrap().children, vec![id.clone()]);
///
/// store.remove_node("child-1");
/// assert_eq!(store.len(), 2);
/// assert!(store.get_node_by_id(&id).is_none());
/// ```
#[derive(Debug)]
pub struct NodeStore {
    config: StoreConfig,

    /// Arena of nodes keyed by id, in insertion order
    nodes: IndexMap<String, Node>,

    selected_node_id: Option<String>,

    /// Broadcast channel for store events
    event_tx: broadcast::Sender<StoreEvent>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Create a store with the default configuration, holding the seed collection
    pub fn new() -> Self {
        Self::build(StoreConfig::default())
    }

    /// Create a store with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns `NodeStoreError::InvalidConfig` if the configuration fails validation.
    pub fn with_config(config: StoreConfig) -> Result<Self, NodeStoreError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StoreConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);
        Self {
            nodes: seed_nodes(&config.root_id),
            config,
            selected_node_id: None,
            event_tx,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Id of the designated root node
    pub fn root_id(&self) -> &str {
        &self.config.root_id
    }

    /// Subscribe to store events
    ///
    /// Events are sent after each committed transition. Receivers created
    /// later do not see earlier events.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    /// Ignores errors if no subscribers (expected when nobody is rendering).
    fn emit_event(&self, event: StoreEvent) {
        let _ = self.event_tx.send(event);
    }

    fn generate_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Add a node, optionally as the last child of `parent_id`.
    ///
    /// An empty `parent_id` is treated like `None`.
    ///
    /// # Errors
    ///
    /// Returns `NodeStoreError::ParentNotFound` if the parent does not exist;
    /// state is left unchanged.
    pub fn try_add_node(
        &mut self,
        data: NodeData,
        parent_id: Option<&str>,
    ) -> Result<String, NodeStoreError> {
        let parent_id = parent_id.filter(|p| !p.is_empty());

        if let Some(parent_id) = parent_id {
            if !self.nodes.contains_key(parent_id) {
                return Err(NodeStoreError::parent_not_found(parent_id));
            }
        }

        let id = self.generate_id();
        let node = Node::with_id(id.clone(), data, parent_id.map(str::to_string));

        if let Some(parent) = parent_id.and_then(|p| self.nodes.get_mut(p)) {
            parent.push_child(id.clone());
        }
        self.nodes.insert(id.clone(), node.clone());

        tracing::debug!(
            "Added node {} ({}) under {:?}",
            id,
            node.node_type,
            node.parent_id
        );
        self.emit_event(StoreEvent::NodeCreated { node });
        Ok(id)
    }

    /// Add a node; a missing parent is logged and ignored.
    ///
    /// Returns the new id, or `None` when nothing was added.
    pub fn add_node(&mut self, data: NodeData, parent_id: Option<&str>) -> Option<String> {
        match self.try_add_node(data, parent_id) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Ignoring add: {}", e);
                None
            }
        }
    }

    /// Apply `update` to the node `id`.
    ///
    /// Returns `Ok(false)` for an empty update (nothing changes, no event).
    ///
    /// # Errors
    ///
    /// Returns `NodeStoreError::NodeNotFound` if `id` does not exist.
    pub fn try_update_node(&mut self, id: &str, update: NodeUpdate) -> Result<bool, NodeStoreError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| NodeStoreError::node_not_found(id))?;

        if !node.apply_update(update) {
            return Ok(false);
        }

        let node = node.clone();
        tracing::debug!("Updated node {}", id);
        self.emit_event(StoreEvent::NodeUpdated { node });
        Ok(true)
    }

    /// Apply `update` to the node `id`; a missing node is logged and ignored.
    ///
    /// Returns whether the node changed.
    pub fn update_node(&mut self, id: &str, update: NodeUpdate) -> bool {
        match self.try_update_node(id, update) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!("Ignoring update: {}", e);
                false
            }
        }
    }

    /// Remove `id` and its whole descendant closure in one transition.
    ///
    /// The removed node is also detached from its surviving parent, and the
    /// selection is cleared if it pointed anywhere inside the removed subtree.
    ///
    /// # Errors
    ///
    /// - `NodeStoreError::NodeNotFound` if `id` does not exist
    /// - `NodeStoreError::ProtectedRoot` if `id` is the protected root
    pub fn try_remove_node(&mut self, id: &str) -> Result<RemoveResult, NodeStoreError> {
        if self.config.protect_root && id == self.config.root_id {
            return Err(NodeStoreError::protected_root(id));
        }
        if !self.nodes.contains_key(id) {
            return Err(NodeStoreError::node_not_found(id));
        }

        let removed = self.descendant_ids(id);
        let doomed: HashSet<&str> = removed.iter().map(String::as_str).collect();

        self.nodes.retain(|node_id, _| !doomed.contains(node_id.as_str()));
        for node in self.nodes.values_mut() {
            node.retain_children(|child_id| !doomed.contains(child_id.as_str()));
        }

        let selection_cleared = self
            .selected_node_id
            .as_deref()
            .is_some_and(|selected| doomed.contains(selected));
        if selection_cleared {
            self.selected_node_id = None;
        }

        tracing::debug!("Removed {} node(s) rooted at {}", removed.len(), id);
        self.emit_event(StoreEvent::NodesRemoved {
            ids: removed.clone(),
            selection_cleared,
        });

        Ok(RemoveResult {
            removed,
            selection_cleared,
        })
    }

    /// Remove `id` and its descendants; unknown ids and the protected root
    /// are logged and ignored.
    pub fn remove_node(&mut self, id: &str) -> RemoveResult {
        self.try_remove_node(id).unwrap_or_else(|e| {
            tracing::warn!("Ignoring remove: {}", e);
            RemoveResult::default()
        })
    }

    /// Reset the collection to the seed and clear the selection
    pub fn clear_nodes(&mut self) {
        self.nodes = seed_nodes(&self.config.root_id);
        self.selected_node_id = None;

        tracing::debug!("Reset node store to seed collection");
        self.emit_event(StoreEvent::NodesCleared);
    }

    /// Move the selection cursor.
    ///
    /// No existence check: an unknown id simply resolves to no node.
    pub fn set_selected_node(&mut self, id: Option<String>) {
        if self.selected_node_id == id {
            return;
        }

        tracing::debug!("Setting selected node: {:?}", id);
        self.selected_node_id = id.clone();
        self.emit_event(StoreEvent::SelectionChanged { id });
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Look up a node by id in the current state
    pub fn get_node_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current selection cursor, whether or not it resolves
    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    /// The node the selection cursor resolves to
    pub fn selected_node(&self) -> Option<&Node> {
        self.selected_node_id
            .as_deref()
            .and_then(|id| self.nodes.get(id))
    }

    /// Whether the edit form should create or update
    pub fn form_mode(&self) -> FormMode<'_> {
        match self.selected_node() {
            Some(node) => FormMode::Update(node),
            None => FormMode::Create,
        }
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            selected_node_id: self.selected_node_id.clone(),
        }
    }

    /// Resolved children of `id` in display order; dangling ids are skipped
    pub fn children_of(&self, id: &str) -> Vec<&Node> {
        self.nodes
            .get(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child_id| self.nodes.get(child_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Descendant closure of `id`: `id` itself followed by every node
    /// reachable through `children`, depth-first.
    ///
    /// Uses an explicit stack, skips child ids that do not resolve, and visits
    /// each node once even if links form a cycle. Empty if `id` is unknown.
    pub fn descendant_ids(&self, id: &str) -> Vec<String> {
        let mut closure = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                if current != id {
                    tracing::warn!("Skipping dangling child reference {}", current);
                }
                continue;
            };
            if !seen.insert(current) {
                continue;
            }

            closure.push(node.id.clone());
            stack.extend(node.children.iter().rev().map(String::as_str));
        }

        closure
    }

    /// Nested display tree anchored at the designated root
    pub fn build_tree(&self) -> TreeNode {
        tree_builder::build_tree(self.nodes.values(), &self.config.root_id)
    }
}
