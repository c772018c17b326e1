//! Utilities to traverse the KDTree structure.

use std::fmt;
use std::marker::PhantomData;

use crate::kdtree::distance::{distance, squared_distance};
use crate::kdtree::node::write_entry;
use crate::kdtree::{KDTreeIndex, NodeId};
use crate::r#type::EmbeddingNum;

/// A borrowed view onto a node stored in a tree.
#[derive(Debug)]
pub struct NodeRef<'a, N: EmbeddingNum, const K: usize, T: KDTreeIndex<N, K>> {
    /// The tree that this node is a reference onto
    tree: &'a T,

    id: NodeId,

    /// Distance from the root, which selects the splitting axis.
    depth: usize,

    phantom: PhantomData<N>,
}

impl<'a, N: EmbeddingNum, const K: usize, T: KDTreeIndex<N, K>> NodeRef<'a, N, K, T> {
    pub(crate) fn new(tree: &'a T, id: NodeId, depth: usize) -> Self {
        Self {
            tree,
            id,
            depth,
            phantom: PhantomData,
        }
    }

    /// The stable id of this node within its tree.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The stored embedding.
    pub fn embedding(&self) -> &'a [N; K] {
        &self.tree.embeddings()[self.id.0]
    }

    /// The label of this node, or `None` when it was inserted from an empty node.
    pub fn label(&self) -> Option<&'a str> {
        self.tree.labels()[self.id.0].as_deref()
    }

    /// Distance from the root, which is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The axis this node splits its children over.
    #[inline]
    pub fn axis(&self) -> usize {
        self.depth % K
    }

    /// The subtree holding points whose value on [`axis`][Self::axis] is less than or equal to
    /// this node's.
    pub fn left_child(&self) -> Option<NodeRef<'a, N, K, T>> {
        self.tree.links()[self.id.0]
            .left
            .map(|id| NodeRef::new(self.tree, id, self.depth + 1))
    }

    /// The subtree holding points whose value on [`axis`][Self::axis] is strictly greater than
    /// this node's.
    pub fn right_child(&self) -> Option<NodeRef<'a, N, K, T>> {
        self.tree.links()[self.id.0]
            .right
            .map(|id| NodeRef::new(self.tree, id, self.depth + 1))
    }

    /// The node this one hangs under, `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a, N, K, T>> {
        self.tree.links()[self.id.0]
            .parent
            .map(|id| NodeRef::new(self.tree, id, self.depth.saturating_sub(1)))
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        let links = &self.tree.links()[self.id.0];
        links.left.is_none() && links.right.is_none()
    }

    /// Euclidean distance from this node's embedding to `query`.
    pub fn distance_to(&self, query: &[N; K]) -> N {
        distance(self.embedding(), query)
    }

    /// Squared Euclidean distance from this node's embedding to `query`.
    pub fn squared_distance_to(&self, query: &[N; K]) -> N {
        squared_distance(self.embedding(), query)
    }
}

impl<N: EmbeddingNum, const K: usize, T: KDTreeIndex<N, K>> Clone for NodeRef<'_, N, K, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: EmbeddingNum, const K: usize, T: KDTreeIndex<N, K>> Copy for NodeRef<'_, N, K, T> {}

impl<N: EmbeddingNum, const K: usize, T: KDTreeIndex<N, K>> PartialEq for NodeRef<'_, N, K, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<N: EmbeddingNum, const K: usize, T: KDTreeIndex<N, K>> fmt::Display
    for NodeRef<'_, N, K, T>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entry(f, self.label(), self.embedding())
    }
}

/// Pre-order iterator over every node reachable from the root.
pub struct PreOrder<'a, N: EmbeddingNum, const K: usize, T: KDTreeIndex<N, K>> {
    stack: Vec<NodeRef<'a, N, K, T>>,
}

impl<'a, N: EmbeddingNum, const K: usize, T: KDTreeIndex<N, K>> PreOrder<'a, N, K, T> {
    pub(crate) fn new(root: Option<NodeRef<'a, N, K, T>>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a, N: EmbeddingNum, const K: usize, T: KDTreeIndex<N, K>> Iterator
    for PreOrder<'a, N, K, T>
{
    type Item = NodeRef<'a, N, K, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right_child());
        self.stack.extend(node.left_child());
        Some(node)
    }
}
