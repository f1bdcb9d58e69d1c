//! View layer for the console: host form rendering, view regions, and the navigation tree seam.

pub mod shell;
pub mod tree;
pub mod view;

pub use shell::ViewShell;
pub use tree::{NavigationTree, TreeCursor};
pub use view::{render_host, AttributeKind, HostView};
