//! Tree Reconstruction
//!
//! Rebuilds the nested display tree from the flat node collection:
//!
//! 1. Index nodes by id for O(1) lookup
//! 2. Create a synthetic root carrying the designated root id
//! 3. Attach, in collection order, every node whose `parent_id` is the root id
//! 4. Resolve each node's `children` ids into embedded `TreeNode`s, depth
//!    first on an explicit stack
//!
//! Child ids that no longer resolve are dropped with a warning. A node that is
//! already on the current path is not expanded again, so a corrupted link
//! cycle cannot loop forever.

use crate::models::{Node, TreeNode};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Type label of the synthetic root element
pub const ROOT_TREE_TYPE: &str = "root";

/// Type label used when a node has an empty `node_type`
pub const UNKNOWN_TREE_TYPE: &str = "unknown";

/// Build the display tree for `nodes`, anchored at `root_id`.
pub fn build_tree<'a, I>(nodes: I, root_id: &str) -> TreeNode
where
    I: IntoIterator<Item = &'a Node>,
{
    let ordered: Vec<&Node> = nodes.into_iter().collect();
    let index: HashMap<&str, &Node> = ordered.iter().map(|n| (n.id.as_str(), *n)).collect();

    let mut path = HashSet::new();
    path.insert(root_id);

    let children = ordered
        .iter()
        .filter(|node| node.parent_id.as_deref() == Some(root_id))
        .filter_map(|node| build_subtree(&node.id, &index, &mut path))
        .collect();

    TreeNode {
        id: root_id.to_string(),
        node_type: ROOT_TREE_TYPE.to_string(),
        props: BTreeMap::new(),
        content: String::new(),
        children,
    }
}

/// Node whose children are still being resolved
struct Frame<'a> {
    node: &'a Node,
    next_child: usize,
    children: Vec<TreeNode>,
}

impl<'a> Frame<'a> {
    fn new(node: &'a Node) -> Self {
        Self {
            node,
            next_child: 0,
            children: Vec::with_capacity(node.children.len()),
        }
    }
}

/// Post-order build on an explicit stack, so depth is bounded by the heap.
fn build_subtree<'a>(
    node_id: &str,
    index: &HashMap<&str, &'a Node>,
    path: &mut HashSet<&'a str>,
) -> Option<TreeNode> {
    let mut stack = vec![Frame::new(enter(node_id, index, path)?)];

    loop {
        let frame = stack.last_mut()?;
        let node = frame.node;

        if let Some(child_id) = node.children.get(frame.next_child) {
            frame.next_child += 1;
            if let Some(child) = enter(child_id, index, path) {
                stack.push(Frame::new(child));
            }
            continue;
        }

        let frame = stack.pop()?;
        path.remove(frame.node.id.as_str());
        let built = to_tree_node(frame.node, frame.children);

        match stack.last_mut() {
            Some(parent) => parent.children.push(built),
            None => return Some(built),
        }
    }
}

/// Resolve `node_id` and put it on the current path
fn enter<'a>(
    node_id: &str,
    index: &HashMap<&str, &'a Node>,
    path: &mut HashSet<&'a str>,
) -> Option<&'a Node> {
    let Some(node) = index.get(node_id).copied() else {
        tracing::warn!("Node with id {} not found, dropping it from the tree", node_id);
        return None;
    };

    if !path.insert(node.id.as_str()) {
        tracing::warn!("Cycle detected at node {}, not expanding it again", node_id);
        return None;
    }

    Some(node)
}

fn to_tree_node(node: &Node, children: Vec<TreeNode>) -> TreeNode {
    TreeNode {
        id: node.id.clone(),
        node_type: if node.node_type.is_empty() {
            UNKNOWN_TREE_TYPE.to_string()
        } else {
            node.node_type.clone()
        },
        props: props_of(node),
        content: node.content.clone().unwrap_or_default(),
        children,
    }
}

fn props_of(node: &Node) -> BTreeMap<String, String> {
    let mut props = node.attributes.clone().unwrap_or_default();
    if let Some(class_name) = &node.class_name {
        props.insert("className".to_string(), class_name.clone());
    }
    props
}
