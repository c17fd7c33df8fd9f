//! Store Services
//!
//! This module contains the state logic consumed by every view:
//!
//! - `NodeStore` - Canonical node collection, selection cursor and CRUD operations
//! - `tree_builder` - Rebuilds the nested display tree from the flat collection
//! - `NodeStoreError` - Typed failures returned by the strict operations

pub mod error;
pub mod node_store;
pub mod tree_builder;

pub use error::NodeStoreError;
pub use node_store::{FormMode, NodeStore, RemoveResult, StoreSnapshot};
pub use tree_builder::build_tree;
