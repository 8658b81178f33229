//! Domain layer: tree model and layout engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod error;
pub mod layout;
pub mod node;
pub mod tree;

pub use builder::{AdjacencyBuilder, NodeKey};
pub use error::{DomainError, TreeResult};
pub use layout::{bounds, compute_positions, Bounds, Placement, Point, Positions};
pub use node::{PostOrderIter, PreOrderIter, TreeNode};
pub use tree::Tree;
