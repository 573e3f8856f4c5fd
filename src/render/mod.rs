//! Output rendering (tree view and JSON)

pub mod json;
pub mod tree;

pub use json::render_json;
pub use tree::render_tree;
