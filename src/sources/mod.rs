//! Local data sources.

mod tree;

pub use tree::{FileNode, TreeOptions, build_tree, render_tree};
