//! Data Models
//!
//! This module contains the data structures shared by the store and its consumers:
//!
//! - `Node` - Flat node record with parent/child id links
//! - `NodeData` / `NodeUpdate` - Creation and patch payloads
//! - `TreeNode` - Nested display tree rebuilt from the flat collection

mod node;
mod tree;

pub use node::{Attributes, Node, NodeData, NodeUpdate};
pub use tree::TreeNode;
