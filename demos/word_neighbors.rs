//! Example indexing a handful of two-dimensional word embeddings and looking up neighbors.
//!
//! Run with `RUST_LOG=word_kdtree=trace` to see every insertion.

use tracing_subscriber::EnvFilter;
use word_kdtree::kdtree::{render_node, KDTreeIndex, WordTree};

fn main() -> word_kdtree::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let tree = WordTree::build([
        ([0.82, 0.31], "king"),
        ([0.79, 0.36], "queen"),
        ([0.45, 0.12], "man"),
        ([0.41, 0.18], "woman"),
        ([-0.63, 0.77], "apple"),
        ([-0.58, 0.71], "pear"),
        ([0.14, -0.92], "car"),
        ([0.22, -0.87], "truck"),
    ])?;
    println!("Indexed {} words, height {}\n", tree.len(), tree.height());

    println!("Exact lookup of (0.45, 0.12):");
    println!("{}\n", render_node(tree.find(&[0.45, 0.12])?));

    println!("Exact lookup of (0.0, 0.0):");
    println!("{}\n", render_node(tree.find(&[0.0, 0.0])?));

    for query in [[0.8, 0.35], [-0.6, 0.7], [0.2, -0.9]] {
        if let Some(nearest) = tree.nearest(&query)? {
            println!(
                "Nearest to {:?} (distance {:.4}):\n{}\n",
                query,
                nearest.distance_to(&query),
                nearest
            );
        }
    }

    Ok(())
}
