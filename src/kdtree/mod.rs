//! An implementation of an insertion-ordered K-D Tree over labeled embeddings.

#![warn(missing_docs)]

mod builder;
pub mod distance;
mod index;
mod node;
mod r#trait;
pub mod traversal;

pub use builder::KDTreeBuilder;
pub use index::{KDTree, Links, NodeId, WordTree};
pub use node::{render_node, Node};
pub use r#trait::KDTreeIndex;
pub use traversal::NodeRef;
