use std::collections::TryReserveError;
use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum KDTreeError {
    /// An argument violated a precondition, such as a vector whose length differs from the
    /// tree's dimensionality.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Growing the node storage failed.
    #[error("Allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, KDTreeError>;
