//! treevis: build trees from adjacency maps or binary-tree arrays, compute a
//! 2D layout and render it as SVG or plain text.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
