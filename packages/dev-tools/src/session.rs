//! REPL session: routes parsed commands through the node store
//!
//! The session owns the store; every write goes through the store's
//! operations and every view is rendered from its current state.

use crate::command::{Command, FieldEdit};
use crate::render;
use domtree_core::models::{NodeData, NodeUpdate};
use domtree_core::services::NodeStore;

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  add <type> [parent-id|-] [class=<name>] [content...]
                                          add a node (root-level with '-' or no parent)
  update <id> <field>=<value>...          fields: type, content, class, attr.<key>
  remove <id>                             remove a node and its descendants
  select <id>|none                        move the selection cursor
  show <id>                               node details
  clear                                   reset to the seed tree
  list | tree | json | form               views
  help | quit";

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text and keep reading
    Continue(String),
    /// Stop the loop
    Quit,
}

/// Interactive session over one store
#[derive(Debug)]
pub struct Session {
    store: NodeStore,
}

impl Session {
    pub fn new(store: NodeStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Execute a command against the store
    pub fn execute(&mut self, command: Command) -> Outcome {
        let output = match command {
            Command::Add {
                node_type,
                parent_id,
                class_name,
                content,
            } => {
                let mut data = NodeData::new(node_type);
                data.class_name = class_name;
                data.content = content;
                match self.store.try_add_node(data, parent_id.as_deref()) {
                    Ok(id) => format!("added {}", id),
                    Err(e) => format!("nothing added: {}", e),
                }
            }
            Command::Update { id, edits } => {
                let update = self.build_update(&id, edits);
                match self.store.try_update_node(&id, update) {
                    Ok(true) => format!("updated {}", id),
                    Ok(false) => format!("{} unchanged", id),
                    Err(e) => format!("nothing updated: {}", e),
                }
            }
            Command::Remove { id } => match self.store.try_remove_node(&id) {
                Ok(result) => {
                    let mut msg = format!("removed {} node(s)", result.removed.len());
                    if result.selection_cleared {
                        msg.push_str("; selection cleared");
                    }
                    msg
                }
                Err(e) => format!("nothing removed: {}", e),
            },
            Command::Select { id } => {
                self.store.set_selected_node(id);
                match (self.store.selected_node_id(), self.store.selected_node()) {
                    (None, _) => "selection cleared".to_string(),
                    (Some(id), Some(_)) => format!("selected {}", id),
                    (Some(id), None) => format!("selected {} (no such node)", id),
                }
            }
            Command::Show { id } => match self.store.get_node_by_id(&id) {
                Some(node) => render::render_node(node),
                None => format!("no node {}", id),
            },
            Command::Clear => {
                self.store.clear_nodes();
                "reset to seed tree".to_string()
            }
            Command::List => render::render_list(&self.store),
            Command::Tree => {
                render::render_tree(&self.store.build_tree(), self.store.selected_node_id())
            }
            Command::Json => render::render_json(&self.store.build_tree()),
            Command::Form => render::render_form(&self.store),
            Command::Help => HELP.to_string(),
            Command::Quit => return Outcome::Quit,
        };

        Outcome::Continue(output)
    }

    /// Turn field edits into a `NodeUpdate`.
    ///
    /// Attribute edits are merged into the node's current attribute map since
    /// `NodeUpdate` replaces the map as a whole.
    fn build_update(&self, id: &str, edits: Vec<FieldEdit>) -> NodeUpdate {
        let mut update = NodeUpdate::new();
        let mut attributes = self
            .store
            .get_node_by_id(id)
            .and_then(|node| node.attributes.clone())
            .unwrap_or_default();
        let mut attributes_touched = false;

        for edit in edits {
            match edit {
                FieldEdit::NodeType(node_type) => update.node_type = Some(node_type),
                FieldEdit::Content(content) => update.content = Some(content),
                FieldEdit::ClassName(class_name) => update.class_name = Some(class_name),
                FieldEdit::Attribute { key, value } => {
                    attributes_touched = true;
                    match value {
                        Some(value) => {
                            attributes.insert(key, value);
                        }
                        None => {
                            attributes.remove(&key);
                        }
                    }
                }
            }
        }

        if attributes_touched {
            update.attributes = Some((!attributes.is_empty()).then_some(attributes));
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session: &mut Session, line: &str) -> String {
        match session.execute(Command::parse(line).unwrap()) {
            Outcome::Continue(text) => text,
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_add_update_remove_flow() {
        let mut session = Session::new(NodeStore::new());

        let added = run(&mut session, "add span child-1 hello");
        let id = added.strip_prefix("added ").unwrap().to_string();
        assert_eq!(
            session.store().get_node_by_id(&id).unwrap().content.as_deref(),
            Some("hello")
        );

        assert_eq!(
            run(&mut session, &format!("update {} type=em attr.title=x", id)),
            format!("updated {}", id)
        );
        let node = session.store().get_node_by_id(&id).unwrap();
        assert_eq!(node.node_type, "em");
        assert_eq!(node.attributes.as_ref().unwrap()["title"], "x");

        assert_eq!(run(&mut session, "remove child-1"), "removed 2 node(s)");
        assert_eq!(session.store().len(), 2);
    }

    #[test]
    fn test_add_with_class_and_spaced_content() {
        let mut session = Session::new(NodeStore::new());

        let added = run(&mut session, "add p child-2 class=lead two  spaces");
        let id = added.strip_prefix("added ").unwrap();
        let node = session.store().get_node_by_id(id).unwrap();

        assert_eq!(node.class_name.as_deref(), Some("lead"));
        assert_eq!(node.content.as_deref(), Some("two  spaces"));
    }

    #[test]
    fn test_attribute_edits_merge_and_clear() {
        let mut session = Session::new(NodeStore::new());
        run(&mut session, "update child-1 attr.a=1 attr.b=2");
        run(&mut session, "update child-1 attr.a=");

        let attrs = session
            .store()
            .get_node_by_id("child-1")
            .unwrap()
            .attributes
            .clone()
            .unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["b"], "2");

        run(&mut session, "update child-1 attr.b=");
        assert!(session
            .store()
            .get_node_by_id("child-1")
            .unwrap()
            .attributes
            .is_none());
    }

    #[test]
    fn test_missing_references_are_reported_not_applied() {
        let mut session = Session::new(NodeStore::new());

        assert!(run(&mut session, "add p ghost").starts_with("nothing added"));
        assert!(run(&mut session, "update ghost type=p").starts_with("nothing updated"));
        assert!(run(&mut session, "remove ghost").starts_with("nothing removed"));
        assert!(run(&mut session, "remove root-node").contains("protected"));
        assert_eq!(session.store().len(), 3);
    }

    #[test]
    fn test_selection_messages() {
        let mut session = Session::new(NodeStore::new());

        assert_eq!(run(&mut session, "select child-1"), "selected child-1");
        assert_eq!(run(&mut session, "remove child-1"), "removed 1 node(s); selection cleared");
        assert_eq!(run(&mut session, "select ghost"), "selected ghost (no such node)");
        assert_eq!(run(&mut session, "select none"), "selection cleared");
    }

    #[test]
    fn test_json_view_is_tree() {
        let mut session = Session::new(NodeStore::new());
        let json: serde_json::Value = serde_json::from_str(&run(&mut session, "json")).unwrap();

        assert_eq!(json["id"], "root-node");
        assert_eq!(json["type"], "root");
        assert_eq!(json["children"][0]["id"], "child-1");
    }

    #[test]
    fn test_deep_tree_views_do_not_abort() {
        let mut session = Session::new(NodeStore::new());
        let mut parent = "child-1".to_string();
        for _ in 0..10_000 {
            let added = run(&mut session, &format!("add div {}", parent));
            parent = added.strip_prefix("added ").unwrap().to_string();
        }

        assert!(run(&mut session, "tree").contains("levels in total"));
        assert!(run(&mut session, "json").starts_with('{'));
    }

    #[test]
    fn test_quit() {
        let mut session = Session::new(NodeStore::new());
        assert_eq!(session.execute(Command::Quit), Outcome::Quit);
    }
}
