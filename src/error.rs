use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Contract violations reported by tree construction and insertion.
///
/// A broken split geometry is not represented here: it panics instead, since the tree can no
/// longer be trusted afterwards.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum QuadTreeError {
    #[error("empty range not permitted, no boundary can be derived")]
    EmptyRange,
    #[error("degenerate boundary: zero extent on the {axis} axis")]
    DegenerateBoundary { axis: Axis },
    #[error("inverted boundary: minimum exceeds maximum on the {axis} axis")]
    InvertedBoundary { axis: Axis },
}
