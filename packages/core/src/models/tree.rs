//! Nested display tree consumed by diagram renderers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One element of the nested display tree.
///
/// `props` merges the node's attributes with its class label (under
/// `className`). Renderers only read this structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,

    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default)]
    pub props: BTreeMap<String, String>,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Total number of elements in this subtree, including `self`
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Number of levels below and including `self`
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            max = max.max(level);
            stack.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        max
    }

    /// Depth-first search for an element by id
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Copy of this subtree cut below `max_depth` levels.
    ///
    /// Returns the copy and whether anything was cut.
    pub fn truncated(&self, max_depth: usize) -> (TreeNode, bool) {
        let mut cut = false;
        let copy = self.truncated_at(max_depth.max(1), &mut cut);
        (copy, cut)
    }

    // Recursion is bounded by `remaining`.
    fn truncated_at(&self, remaining: usize, cut: &mut bool) -> TreeNode {
        let children = if remaining > 1 {
            self.children
                .iter()
                .map(|child| child.truncated_at(remaining - 1, cut))
                .collect()
        } else {
            *cut |= !self.children.is_empty();
            Vec::new()
        };

        TreeNode {
            id: self.id.clone(),
            node_type: self.node_type.clone(),
            props: self.props.clone(),
            content: self.content.clone(),
            children,
        }
    }
}

impl Drop for TreeNode {
    // Unlink children onto a heap stack; the derived drop would recurse per level.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf(id: &str) -> TreeNode {
        TreeNode {
            id: id.to_string(),
            node_type: "div".to_string(),
            props: BTreeMap::new(),
            content: String::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_size_depth_and_find() {
        let mut root = leaf("root");
        let mut mid = leaf("mid");
        mid.children.push(leaf("deep"));
        root.children.push(mid);
        root.children.push(leaf("side"));

        assert_eq!(root.size(), 4);
        assert_eq!(root.depth(), 3);
        assert_eq!(root.find("deep").map(|n| n.id.as_str()), Some("deep"));
        assert!(root.find("missing").is_none());
    }

    #[test]
    fn test_find_returns_first_in_preorder() {
        let mut root = leaf("root");
        let mut first = leaf("a");
        first.children.push(leaf("dup"));
        let mut second = leaf("b");
        second.children.push(leaf("dup"));
        second.children[0].content = "second".to_string();
        root.children.push(first);
        root.children.push(second);

        assert_eq!(root.find("dup").map(|n| n.content.as_str()), Some(""));
    }

    #[test]
    fn test_truncated_cuts_below_depth() {
        let mut root = leaf("root");
        let mut mid = leaf("mid");
        mid.children.push(leaf("deep"));
        root.children.push(mid);

        let (cut, was_cut) = root.truncated(2);
        assert!(was_cut);
        assert_eq!(cut.depth(), 2);
        assert!(cut.find("deep").is_none());

        let (whole, was_cut) = root.truncated(3);
        assert!(!was_cut);
        assert_eq!(whole, root);
    }

    #[test]
    fn test_deep_tree_is_walked_and_dropped_iteratively() {
        let depth = 50_000;
        let mut tree = leaf("n0");
        for i in 1..depth {
            let mut parent = leaf(&format!("n{}", i));
            parent.children.push(tree);
            tree = parent;
        }

        assert_eq!(tree.size(), depth);
        assert_eq!(tree.depth(), depth);
        assert!(tree.find("n0").is_some());
        drop(tree);
    }

    #[test]
    fn test_serializes_type_field() {
        let value = serde_json::to_value(leaf("x")).unwrap();
        assert_eq!(value["type"], "div");
        assert_eq!(value["children"], json!([]));
    }
}
