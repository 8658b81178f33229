//! Application layer: input documents, labelling, rendering and services
//!
//! This layer orchestrates the domain and owns every file-system touch point.

pub mod display;
pub mod error;
pub mod error_ext;
pub mod input;
pub mod labels;
pub mod render;
pub mod services;

pub use display::text_tree;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use input::{binary_tree_from_tokens, AdjacencyDocument, LabeledTree};
pub use labels::{display_lines, node_label, DisplayLabeler, IdLabeler, LabelError, Labeler};
pub use render::SvgRenderer;
