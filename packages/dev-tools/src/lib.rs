//! domtree Development Tools
//!
//! Terminal consumers of the node store: a command parser, text renderers for
//! the list, diagram and form views, and a session that routes commands
//! through a `NodeStore`.

pub mod command;
pub mod config;
pub mod render;
pub mod session;

pub use command::{Command, CommandError, FieldEdit};
pub use session::{Outcome, Session};
