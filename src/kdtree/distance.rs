//! Distance and equality helpers over fixed-size embeddings.

use crate::error::{KDTreeError, Result};
use crate::r#type::EmbeddingNum;

/// Squared Euclidean distance between two embeddings.
#[inline]
pub fn squared_distance<N: EmbeddingNum, const K: usize>(a: &[N; K], b: &[N; K]) -> N {
    a.iter().zip(b.iter()).fold(N::zero(), |acc, (&x, &y)| {
        let d = x - y;
        acc + d * d
    })
}

/// Euclidean distance between two embeddings.
#[inline]
pub fn distance<N: EmbeddingNum, const K: usize>(a: &[N; K], b: &[N; K]) -> N {
    squared_distance(a, b).sqrt()
}

/// Exact element-wise equality, with no tolerance.
#[inline]
pub fn embeddings_equal<N: EmbeddingNum, const K: usize>(a: &[N; K], b: &[N; K]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// Copy a slice into a fixed-size embedding, checking its length against `K`.
pub fn to_embedding<N: EmbeddingNum, const K: usize>(vector: &[N]) -> Result<[N; K]> {
    vector.try_into().map_err(|_| {
        KDTreeError::InvalidArgument(format!(
            "Got vector of length {} when expected {}.",
            vector.len(),
            K
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance_to_self_is_zero() {
        let a = [1.5f32, -2.25, 8.0];
        assert_eq!(squared_distance(&a, &a), 0.0);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = [0.25f64, 7.0];
        let b = [-3.5f64, 1.125];
        assert_eq!(distance(&a, &b), distance(&b, &a));
        assert_eq!(squared_distance(&a, &b), squared_distance(&b, &a));
    }

    #[test]
    fn distance_squares_to_squared_distance() {
        let a = [0.0f32, 0.0];
        let b = [3.0f32, 4.0];
        assert_eq!(squared_distance(&a, &b), 25.0);
        assert_eq!(distance(&a, &b), 5.0);
        assert_eq!(distance(&a, &b) * distance(&a, &b), squared_distance(&a, &b));
    }

    #[test]
    fn equality_is_exact() {
        assert!(embeddings_equal(&[1.0f32, 2.0], &[1.0, 2.0]));
        assert!(!embeddings_equal(&[1.0f32, 2.0], &[1.0, 2.0 + f32::EPSILON * 2.0]));
        assert!(!embeddings_equal(&[f32::NAN, 2.0], &[f32::NAN, 2.0]));
    }

    #[test]
    fn rejects_wrong_length() {
        let ok: [f32; 2] = to_embedding(&[1.0, 2.0]).unwrap();
        assert_eq!(ok, [1.0, 2.0]);

        let err = to_embedding::<f32, 2>(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, KDTreeError::InvalidArgument(_)));
        assert!(to_embedding::<f32, 2>(&[]).is_err());
    }
}
