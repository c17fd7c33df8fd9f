//! domtree Core Store Layer
//!
//! This crate provides the in-memory node store behind the domtree tree
//! sketcher: a flat collection of labeled nodes linked by parent/child ids,
//! the operations that keep those links symmetric, and the helpers views need
//! to display it.
//!
//! # Architecture
//!
//! - **Arena + ids**: Nodes live in an id-indexed, insertion-ordered map; child
//!   links are ordered id lists, never object references
//! - **Owned state**: A `NodeStore` is constructed and passed around explicitly
//! - **Atomic transitions**: Each operation commits a full new state, then emits
//!   one `StoreEvent`
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, NodeData, NodeUpdate, TreeNode)
//! - [`services`] - NodeStore and tree reconstruction
//! - [`events`] - Events broadcast after each transition
//! - [`config`] - Store configuration

pub mod config;
pub mod events;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::StoreConfig;
pub use events::StoreEvent;
pub use models::*;
pub use services::*;
