use tracing::{debug, trace};

use crate::error::{KDTreeError, Result};
use crate::kdtree::distance::to_embedding;
use crate::kdtree::{KDTreeBuilder, Node};
use crate::r#type::EmbeddingNum;

/// A stable handle onto a node stored in a [`KDTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The insertion index of this node.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Parent and child links of a stored node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl Links {
    /// The node this one was attached under, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The child holding points less than or equal to this node on its splitting axis.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// The child holding points greater than this node on its splitting axis.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }
}

/// An owned k-d tree over `K`-dimensional embeddings.
///
/// Nodes live in parallel arrays indexed by [`NodeId`], in insertion order. The tree shape is
/// determined solely by insertion order: there is no rebalancing.
#[derive(Debug, Clone, PartialEq)]
pub struct KDTree<N: EmbeddingNum, const K: usize> {
    pub(crate) embeddings: Vec<[N; K]>,
    pub(crate) labels: Vec<Option<String>>,
    pub(crate) links: Vec<Links>,
    pub(crate) root: Option<NodeId>,
}

/// The observed configuration: two-dimensional `f32` word embeddings.
pub type WordTree = KDTree<f32, 2>;

impl<N: EmbeddingNum, const K: usize> KDTree<N, K> {
    const NON_ZERO_DIMENSION: () = assert!(K > 0, "k-d tree dimensionality must be non-zero");

    /// Create an empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty tree with room for `num_items` nodes.
    pub fn with_capacity(num_items: usize) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_ZERO_DIMENSION;

        Self {
            embeddings: Vec::with_capacity(num_items),
            labels: Vec::with_capacity(num_items),
            links: Vec::with_capacity(num_items),
            root: None,
        }
    }

    /// Build a tree by inserting `points` one at a time, in order.
    ///
    /// The first point becomes the root. Fails on an empty sequence or on any vector whose
    /// length is not `K`, in which case nothing is built.
    pub fn build<I, V, S>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = (V, S)>,
        V: AsRef<[N]>,
        S: Into<String>,
    {
        let points = points.into_iter();
        let mut builder = KDTreeBuilder::new(points.size_hint().0);
        for (vector, label) in points {
            builder.add(vector.as_ref(), label)?;
        }
        builder.finish()
    }

    /// Insert a labeled vector, returning the id of the new leaf.
    pub fn insert(&mut self, vector: &[N], label: impl Into<String>) -> Result<NodeId> {
        let embedding = to_embedding(vector)?;
        self.reserve(1)?;
        Ok(self.insert_embedding(embedding, Some(label.into())))
    }

    /// Insert a detached node and every node of its adopted subtrees.
    ///
    /// Children are inserted in pre-order after the node itself, each through the regular
    /// insertion rule, so they may not end up below it. Returns the id of `node`.
    pub fn insert_node(&mut self, node: Node<N, K>) -> Result<NodeId> {
        self.reserve(node.subtree_len())?;

        let Node {
            embedding,
            label,
            left,
            right,
        } = node;
        let id = self.insert_embedding(embedding, label);

        // Push right first so the left subtree is inserted first
        let mut stack: Vec<Box<Node<N, K>>> = right.into_iter().chain(left).collect();
        while let Some(child) = stack.pop() {
            let Node {
                embedding,
                label,
                left,
                right,
            } = *child;
            self.insert_embedding(embedding, label);
            stack.extend(right);
            stack.extend(left);
        }

        Ok(id)
    }

    /// Release every node, leaving an empty tree.
    pub fn clear(&mut self) {
        debug!(num_items = self.embeddings.len(), "clearing k-d tree");
        self.embeddings.clear();
        self.labels.clear();
        self.links.clear();
        self.root = None;
    }

    /// Reserve room for `additional` nodes before any structural change.
    pub(crate) fn reserve(&mut self, additional: usize) -> Result<()> {
        self.embeddings.try_reserve(additional)?;
        self.labels.try_reserve(additional)?;
        self.links.try_reserve(additional)?;
        Ok(())
    }

    /// Descend from the root to the first free child slot and attach a new leaf there.
    ///
    /// Callers must have reserved capacity beforehand.
    pub(crate) fn insert_embedding(&mut self, embedding: [N; K], label: Option<String>) -> NodeId {
        let id = NodeId(self.embeddings.len());

        let mut parent = None;
        let mut depth = 0;
        if let Some(root) = self.root {
            let mut current = root;
            loop {
                let axis = depth % K;
                let go_right = embedding[axis] > self.embeddings[current.0][axis];
                let links = &mut self.links[current.0];
                let slot = if go_right {
                    &mut links.right
                } else {
                    &mut links.left
                };
                depth += 1;
                match *slot {
                    Some(next) => current = next,
                    None => {
                        *slot = Some(id);
                        parent = Some(current);
                        break;
                    }
                }
            }
        } else {
            self.root = Some(id);
        }

        self.embeddings.push(embedding);
        self.labels.push(label);
        self.links.push(Links {
            parent,
            left: None,
            right: None,
        });

        trace!(id = id.0, depth, "inserted node");
        id
    }
}

impl<N: EmbeddingNum, const K: usize> Default for KDTree<N, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: EmbeddingNum, const K: usize> TryFrom<Node<N, K>> for KDTree<N, K> {
    type Error = KDTreeError;

    fn try_from(node: Node<N, K>) -> Result<Self> {
        let mut tree = Self::new();
        tree.insert_node(node)?;
        Ok(tree)
    }
}
