use bytemuck::cast_slice;
use tinyvec::TinyVec;

use crate::error::Result;
use crate::kdtree::distance::{embeddings_equal, squared_distance, to_embedding};
use crate::kdtree::traversal::{NodeRef, PreOrder};
use crate::kdtree::{KDTree, Links, NodeId};
use crate::r#type::EmbeddingNum;

/// A trait for searching and accessing data out of a KDTree.
pub trait KDTreeIndex<N: EmbeddingNum, const K: usize>: Sized {
    /// The stored embeddings, in insertion order
    fn embeddings(&self) -> &[[N; K]];

    /// The stored labels, in insertion order
    fn labels(&self) -> &[Option<String>];

    /// The parent and child links of each stored node, in insertion order
    fn links(&self) -> &[Links];

    /// The id of the root node, if the tree is not empty
    fn root_id(&self) -> Option<NodeId>;

    /// The number of items in this KDTree
    fn len(&self) -> usize {
        self.embeddings().len()
    }

    /// Returns `true` if the tree holds no nodes.
    fn is_empty(&self) -> bool {
        self.root_id().is_none()
    }

    /// All stored coordinates as one flat slice, `K` values per item.
    fn coords(&self) -> &[N] {
        cast_slice(self.embeddings())
    }

    /// The number of levels of the tree. An empty tree has height 0.
    fn height(&self) -> usize {
        self.iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Access the root node of the KDTree for manual traversal.
    fn root(&self) -> Option<NodeRef<'_, N, K, Self>> {
        self.root_id().map(|id| NodeRef::new(self, id, 0))
    }

    /// Access a node by id. Returns `None` for ids not issued by this tree.
    fn node(&self, id: NodeId) -> Option<NodeRef<'_, N, K, Self>> {
        let links = self.links();
        if id.0 >= links.len() {
            return None;
        }

        let mut depth = 0;
        let mut current = links[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = links[parent.0].parent;
        }
        Some(NodeRef::new(self, id, depth))
    }

    /// Iterate over every node reachable from the root, in pre-order.
    fn iter(&self) -> PreOrder<'_, N, K, Self> {
        PreOrder::new(self.root())
    }

    /// Search the index for a node whose embedding is exactly equal to `query`.
    ///
    /// The search follows a single path from the root. When a node's value on its splitting axis
    /// equals the query's but the rest of the embedding differs, the search stops there and
    /// reports no match, even if an equal embedding is stored deeper in either subtree.
    fn find(&self, query: &[N]) -> Result<Option<NodeRef<'_, N, K, Self>>> {
        let query: [N; K] = to_embedding(query)?;
        let embeddings = self.embeddings();
        let links = self.links();

        let mut current = self.root_id();
        let mut depth = 0;
        while let Some(id) = current {
            let embedding = &embeddings[id.0];
            if embeddings_equal(embedding, &query) {
                return Ok(Some(NodeRef::new(self, id, depth)));
            }

            let axis = depth % K;
            current = if embedding[axis] < query[axis] {
                links[id.0].right
            } else if embedding[axis] > query[axis] {
                links[id.0].left
            } else {
                None
            };
            depth += 1;
        }

        Ok(None)
    }

    /// Search the index for the node closest to `query` by Euclidean distance.
    ///
    /// Returns `None` only when the tree is empty. Among equally distant nodes the one found
    /// first wins: the subtree on the query's side of each split is searched before the node
    /// itself, and the far side is only searched when it could hold a point at least as close.
    fn nearest(&self, query: &[N]) -> Result<Option<NodeRef<'_, N, K, Self>>> {
        let query: [N; K] = to_embedding(query)?;
        let embeddings = self.embeddings();
        let links = self.links();

        let Some(root) = self.root_id() else {
            return Ok(None);
        };

        // Closer of two candidates, keeping `a` on ties
        let closest = |a: Option<Candidate>, b: Candidate| -> Candidate {
            match a {
                Some(a)
                    if squared_distance(&embeddings[a.id], &query)
                        > squared_distance(&embeddings[b.id], &query) =>
                {
                    b
                }
                Some(a) => a,
                None => b,
            }
        };

        // Explicit call stack, so degenerate trees don't exhaust the thread's stack.
        // Use TinyVec to avoid heap allocations for shallow trees
        let mut stack: TinyVec<[Frame; 32]> = TinyVec::new();
        stack.push(Frame::new(root.0, 0));
        let mut returned: Option<Candidate> = None;

        while let Some(frame) = stack.last_mut() {
            let embedding = &embeddings[frame.id];
            let axis = frame.depth % K;
            let Links { left, right, .. } = links[frame.id];
            let (primary, secondary) = if query[axis] >= embedding[axis] {
                (right, left)
            } else {
                (left, right)
            };

            match frame.stage {
                Stage::Descend => {
                    frame.stage = Stage::Primary;
                    let child_depth = frame.depth + 1;
                    returned = None;
                    if let Some(child) = primary {
                        stack.push(Frame::new(child.0, child_depth));
                    }
                }
                Stage::Primary => {
                    let best = closest(returned, frame.candidate());
                    frame.best = best;
                    frame.stage = Stage::Secondary;

                    let best_dist = squared_distance(&embeddings[best.id], &query);
                    let plane = query[axis] - embedding[axis];
                    let child_depth = frame.depth + 1;
                    returned = None;
                    if let Some(child) = secondary {
                        if best_dist >= plane * plane {
                            stack.push(Frame::new(child.0, child_depth));
                        }
                    }
                }
                Stage::Secondary => {
                    let best = match returned {
                        Some(other) => closest(Some(frame.best), other),
                        None => frame.best,
                    };
                    stack.pop();
                    returned = Some(best);
                }
            }
        }

        Ok(returned.map(|best| NodeRef::new(self, NodeId(best.id), best.depth)))
    }
}

/// A node found by nearest-neighbor search, with the depth it was found at.
#[derive(Debug, Clone, Copy, Default)]
struct Candidate {
    id: usize,
    depth: usize,
}

/// Where an emulated recursive call of the nearest-neighbor search will resume.
#[derive(Debug, Clone, Copy, Default)]
enum Stage {
    /// Not yet visited; descend into the child on the query's side.
    #[default]
    Descend,
    /// The near subtree returned; weigh this node and decide whether to cross the split.
    Primary,
    /// The far subtree returned (or was pruned).
    Secondary,
}

#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    id: usize,
    depth: usize,
    stage: Stage,
    /// Best candidate of this node and its near subtree, set once `stage` reaches `Secondary`
    best: Candidate,
}

impl Frame {
    fn new(id: usize, depth: usize) -> Self {
        Self {
            id,
            depth,
            stage: Stage::Descend,
            best: Candidate::default(),
        }
    }

    fn candidate(&self) -> Candidate {
        Candidate {
            id: self.id,
            depth: self.depth,
        }
    }
}

impl<N: EmbeddingNum, const K: usize> KDTreeIndex<N, K> for KDTree<N, K> {
    fn embeddings(&self) -> &[[N; K]] {
        &self.embeddings
    }

    fn labels(&self) -> &[Option<String>] {
        &self.labels
    }

    fn links(&self) -> &[Links] {
        &self.links
    }

    fn root_id(&self) -> Option<NodeId> {
        self.root
    }
}
