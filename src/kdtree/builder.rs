use tracing::debug;

use crate::error::{KDTreeError, Result};
use crate::kdtree::distance::to_embedding;
use crate::kdtree::{KDTree, KDTreeIndex};
use crate::r#type::EmbeddingNum;

/// A builder to create a [`KDTree`] from a sequence of labeled points.
///
/// Points are validated as they are added and inserted one at a time, in the order they were
/// added, when the builder is finished. The first point added becomes the root.
pub struct KDTreeBuilder<N: EmbeddingNum, const K: usize> {
    points: Vec<([N; K], String)>,
}

impl<N: EmbeddingNum, const K: usize> KDTreeBuilder<N, K> {
    /// Create a new builder with room for the provided number of items.
    pub fn new(num_items: usize) -> Self {
        Self {
            points: Vec::with_capacity(num_items),
        }
    }

    /// Add a point to the index, returning its insertion index.
    pub fn add(&mut self, vector: &[N], label: impl Into<String>) -> Result<usize> {
        let embedding = to_embedding(vector)?;
        self.points.try_reserve(1)?;

        let index = self.points.len();
        self.points.push((embedding, label.into()));
        Ok(index)
    }

    /// The number of points added so far.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no point has been added yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consume this builder, inserting every point into a new tree.
    pub fn finish(self) -> Result<KDTree<N, K>> {
        if self.points.is_empty() {
            return Err(KDTreeError::InvalidArgument(
                "Cannot build a k-d tree from an empty sequence of points.".to_string(),
            ));
        }

        let mut tree = KDTree::new();
        tree.reserve(self.points.len())?;
        for (embedding, label) in self.points {
            tree.insert_embedding(embedding, Some(label));
        }

        debug!(
            num_items = tree.len(),
            height = tree.height(),
            "built k-d tree"
        );
        Ok(tree)
    }
}
