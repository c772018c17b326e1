//! Detached nodes, built outside of a tree and handed to [`KDTree::insert_node`].
//!
//! [`KDTree::insert_node`]: crate::kdtree::KDTree::insert_node

use std::fmt;

use crate::error::Result;
use crate::kdtree::distance::to_embedding;
use crate::r#type::EmbeddingNum;

/// A labeled embedding that is not (yet) part of a tree.
///
/// A node may adopt detached children. When inserted, the children are not grafted as-is: every
/// point of the subtree is re-inserted so that the tree's partition property holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<N: EmbeddingNum, const K: usize> {
    pub(crate) embedding: [N; K],
    pub(crate) label: Option<String>,
    pub(crate) left: Option<Box<Node<N, K>>>,
    pub(crate) right: Option<Box<Node<N, K>>>,
}

impl<N: EmbeddingNum, const K: usize> Node<N, K> {
    /// Create a node from a vector of length `K` and its label.
    pub fn new(vector: &[N], label: impl Into<String>) -> Result<Self> {
        Self::with_children(vector, label, None, None)
    }

    /// Create a node adopting the given children.
    pub fn with_children(
        vector: &[N],
        label: impl Into<String>,
        left: Option<Node<N, K>>,
        right: Option<Node<N, K>>,
    ) -> Result<Self> {
        Ok(Self {
            embedding: to_embedding(vector)?,
            label: Some(label.into()),
            left: left.map(Box::new),
            right: right.map(Box::new),
        })
    }

    /// A placeholder node with a zeroed embedding and no label.
    pub fn empty() -> Self {
        Self {
            embedding: [N::zero(); K],
            label: None,
            left: None,
            right: None,
        }
    }

    /// The embedding this node was created with.
    pub fn embedding(&self) -> &[N; K] {
        &self.embedding
    }

    /// The label, or `None` for an empty node.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The adopted left child.
    pub fn left(&self) -> Option<&Node<N, K>> {
        self.left.as_deref()
    }

    /// The adopted right child.
    pub fn right(&self) -> Option<&Node<N, K>> {
        self.right.as_deref()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.left());
            stack.extend(node.right());
        }
        count
    }
}

impl<N: EmbeddingNum, const K: usize> Default for Node<N, K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<N: EmbeddingNum, const K: usize> fmt::Display for Node<N, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entry(f, self.label(), &self.embedding)
    }
}

/// Render an optional node for debugging, writing `empty node` when it is absent.
pub fn render_node<T: fmt::Display>(node: Option<T>) -> String {
    match node {
        Some(node) => node.to_string(),
        None => EMPTY_NODE.to_string(),
    }
}

const EMPTY_NODE: &str = "empty node";

/// Shared textual form of a stored or detached node.
pub(crate) fn write_entry<N: EmbeddingNum>(
    f: &mut fmt::Formatter<'_>,
    label: Option<&str>,
    embedding: &[N],
) -> fmt::Result {
    let Some(label) = label else {
        return f.write_str(EMPTY_NODE);
    };

    writeln!(f, "word: {}", label)?;
    f.write_str("embedding: ")?;
    for value in embedding {
        write!(f, "{} ", Scientific(*value))?;
    }
    Ok(())
}

/// Scientific notation with six fractional digits and an explicitly signed, two-digit exponent,
/// e.g. `5.000000e+00`.
struct Scientific<N>(N);

impl<N: EmbeddingNum> fmt::Display for Scientific<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_nan() {
            return f.write_str("nan");
        }
        if self.0.is_infinite() {
            return f.write_str(if self.0.is_sign_negative() { "-inf" } else { "inf" });
        }

        let raw = format!("{:.6e}", self.0);
        let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
    }
}
