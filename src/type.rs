use std::fmt::{Debug, LowerExp};

use num_traits::Float;

/// A trait for scalar types that can be stored as embedding components.
///
/// This trait is sealed and cannot be implemented for external types. Only `f32` and `f64` are
/// supported, since nearest-neighbor search needs a square root and exact search compares
/// values with floating-point equality.
pub trait EmbeddingNum:
    private::Sealed + Float + Debug + LowerExp + Default + Send + Sync + bytemuck::Pod
{
}

impl EmbeddingNum for f32 {}

impl EmbeddingNum for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
