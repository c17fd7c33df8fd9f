//! Text renderers for the REPL views
//!
//! - list view: one line per node in collection order
//! - diagram: the nested display tree drawn with `termtree`
//! - json: the nested display tree as pretty JSON
//! - node detail and edit form mode
//!
//! The diagram and json views show at most [`MAX_VIEW_DEPTH`] levels; deeper
//! elements are cut from the view, never from the store.

use domtree_core::models::{Node, TreeNode};
use domtree_core::services::{FormMode, NodeStore};
use std::fmt::Write;
use termtree::Tree as DisplayTree;

/// Marker printed next to the selected node
pub const SELECTED_MARKER: &str = "*";

/// Levels of the display tree shown by the diagram and json views
pub const MAX_VIEW_DEPTH: usize = 50;

/// Characters of content shown in a diagram label before it is elided
pub const CONTENT_PREVIEW_CHARS: usize = 15;

/// Marker for root-level nodes that the diagram does not reach
pub const DETACHED_MARKER: &str = "(not in diagram)";

/// Flat list view of every node, in insertion order
pub fn render_list(store: &NodeStore) -> String {
    if store.is_empty() {
        return "No nodes added yet. Use 'add' to create one.".to_string();
    }

    let selected = store.selected_node_id();
    let mut out = String::new();
    for node in store.nodes() {
        let marker = if selected == Some(node.id.as_str()) {
            SELECTED_MARKER
        } else {
            " "
        };
        let _ = write!(out, "{} {}", marker, node_summary(node));
        if node.is_root_level() && node.id != store.root_id() {
            let _ = write!(out, " {}", DETACHED_MARKER);
        }
        out.push('\n');
    }
    out
}

fn node_summary(node: &Node) -> String {
    let mut line = format!("{} [{}]", node.node_type, node.id);
    if let Some(class_name) = &node.class_name {
        let _ = write!(line, " class={}", class_name);
    }
    if let Some(content) = &node.content {
        let _ = write!(line, " content={:?}", content);
    }
    if let Some(attributes) = node.attributes.as_ref().filter(|a| !a.is_empty()) {
        let attrs = serde_json::to_string(attributes).unwrap_or_default();
        let _ = write!(line, " attributes={}", attrs);
    }
    line
}

fn tree_label(node: &TreeNode, selected: Option<&str>) -> String {
    let mut label = format!("{} [{}]", node.node_type, node.id);
    if let Some(class_name) = node.props.get("className") {
        let _ = write!(label, " .{}", class_name);
    }
    if !node.content.is_empty() {
        let _ = write!(label, " {:?}", content_preview(&node.content));
    }
    if selected == Some(node.id.as_str()) {
        let _ = write!(label, " {}", SELECTED_MARKER);
    }
    label
}

fn content_preview(content: &str) -> String {
    match content.char_indices().nth(CONTENT_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

// Callers pass trees cut to `MAX_VIEW_DEPTH`, which bounds the recursion.
fn to_display_tree(node: &TreeNode, selected: Option<&str>) -> DisplayTree<String> {
    DisplayTree::new(tree_label(node, selected)).with_leaves(
        node.children
            .iter()
            .map(|child| to_display_tree(child, selected)),
    )
}

/// Diagram view of the display tree
pub fn render_tree(tree: &TreeNode, selected: Option<&str>) -> String {
    let (shown, cut) = tree.truncated(MAX_VIEW_DEPTH);
    let mut out = to_display_tree(&shown, selected).to_string();
    if cut {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        let _ = write!(
            out,
            "... {} levels in total, showing the first {}",
            tree.depth(),
            MAX_VIEW_DEPTH
        );
    }
    out
}

/// Pretty JSON view of the display tree
pub fn render_json(tree: &TreeNode) -> String {
    let (shown, cut) = tree.truncated(MAX_VIEW_DEPTH);
    if cut {
        tracing::warn!(
            "Tree has {} levels; JSON view shows the first {}",
            tree.depth(),
            MAX_VIEW_DEPTH
        );
    }
    serde_json::to_string_pretty(&shown)
        .unwrap_or_else(|e| format!("failed to serialize tree: {}", e))
}

/// Detail view of a single node
pub fn render_node(node: &Node) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id:        {}", node.id);
    let _ = writeln!(out, "type:      {}", node.node_type);
    let _ = writeln!(
        out,
        "parent:    {}",
        node.parent_id.as_deref().unwrap_or("(none)")
    );
    if node.is_leaf() {
        let _ = writeln!(out, "children:  (none)");
    } else {
        let _ = writeln!(out, "children:  [{}]", node.children.join(", "));
    }
    if let Some(content) = &node.content {
        let _ = writeln!(out, "content:   {:?}", content);
    }
    if let Some(class_name) = &node.class_name {
        let _ = writeln!(out, "class:     {}", class_name);
    }
    if let Some(attributes) = &node.attributes {
        for (key, value) in attributes {
            let _ = writeln!(out, "attr.{}: {}", key, value);
        }
    }
    let _ = writeln!(out, "modified:  {}", node.modified_at.to_rfc3339());
    out
}

/// Edit form mode derived from the selection
pub fn render_form(store: &NodeStore) -> String {
    match store.form_mode() {
        FormMode::Create => {
            "Form: create (new nodes are added as root-level nodes or under a given parent)"
                .to_string()
        }
        FormMode::Update(node) => format!("Form: update {}", node_summary(node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domtree_core::models::NodeData;

    #[test]
    fn test_render_list_marks_selection() {
        let mut store = NodeStore::new();
        store.set_selected_node(Some("child-2".to_string()));

        let out = render_list(&store);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  root [root-node]"));
        assert!(lines[2].starts_with("* div [child-2]"));
    }

    #[test]
    fn test_render_list_empty_store() {
        let mut store = NodeStore::with_config(
            domtree_core::StoreConfig::default().with_protect_root(false),
        )
        .unwrap();
        store.remove_node("root-node");

        assert!(render_list(&store).starts_with("No nodes added yet"));
    }

    #[test]
    fn test_render_list_shows_optional_fields() {
        let mut store = NodeStore::new();
        store.add_node(
            NodeData::new("a")
                .with_content("home")
                .with_class_name("nav")
                .with_attribute("href", "/"),
            None,
        );

        let out = render_list(&store);
        let last = out.lines().last().unwrap();

        assert!(last.contains("class=nav"));
        assert!(last.contains("content=\"home\""));
        assert!(last.contains("attributes={\"href\":\"/\"}"));
    }

    #[test]
    fn test_render_tree_contains_every_label() {
        let mut store = NodeStore::new();
        let id = store
            .add_node(NodeData::new("span").with_content("hi"), Some("child-1"))
            .unwrap();

        let out = render_tree(&store.build_tree(), Some(&id));

        assert_eq!(out.lines().count(), 4);
        assert!(out.lines().next().unwrap().starts_with("root [root-node]"));
        assert!(out.contains(&format!("span [{}] \"hi\" *", id)));
    }

    #[test]
    fn test_render_list_flags_detached_root_level_nodes() {
        let mut store = NodeStore::new();
        store.add_node(NodeData::new("aside"), None);

        let out = render_list(&store);
        let lines: Vec<&str> = out.lines().collect();

        assert!(!lines[0].contains(DETACHED_MARKER));
        assert!(lines[3].ends_with(DETACHED_MARKER));
    }

    #[test]
    fn test_tree_label_elides_long_content() {
        let mut store = NodeStore::new();
        store.add_node(
            NodeData::new("p").with_content("The quick brown fox jumps"),
            Some("child-2"),
        );
        store.add_node(
            NodeData::new("p").with_content("exactly fifteen"),
            Some("child-2"),
        );

        let out = render_tree(&store.build_tree(), None);

        assert!(out.contains("\"The quick brown...\""));
        assert!(out.contains("\"exactly fifteen\""));
        assert!(!out.contains("jumps"));
    }

    #[test]
    fn test_content_preview_counts_characters() {
        assert_eq!(content_preview("ééééééééééééééééé"), "ééééééééééééééé...");
        assert_eq!(content_preview(""), "");
    }

    #[test]
    fn test_deep_tree_views_are_cut() {
        let mut store = NodeStore::new();
        let mut parent = "child-1".to_string();
        for _ in 0..10_000 {
            parent = store.add_node(NodeData::new("div"), Some(&parent)).unwrap();
        }
        let tree = store.build_tree();

        let diagram = render_tree(&tree, None);
        assert_eq!(diagram.lines().count(), MAX_VIEW_DEPTH + 2);
        assert!(diagram
            .lines()
            .last()
            .unwrap()
            .starts_with("... 10002 levels in total"));

        let json: serde_json::Value = serde_json::from_str(&render_json(&tree)).unwrap();
        assert_eq!(json["id"], "root-node");
    }

    #[test]
    fn test_render_form_modes() {
        let mut store = NodeStore::new();
        assert!(render_form(&store).starts_with("Form: create"));

        store.set_selected_node(Some("child-1".to_string()));
        assert_eq!(render_form(&store), "Form: update div [child-1]");
    }

    #[test]
    fn test_render_node_details() {
        let store = NodeStore::new();
        let out = render_node(store.get_node_by_id("root-node").unwrap());

        assert!(out.contains("parent:    (none)"));
        assert!(out.contains("children:  [child-1, child-2]"));

        let leaf = render_node(store.get_node_by_id("child-1").unwrap());
        assert!(leaf.contains("children:  (none)"));
    }
}
