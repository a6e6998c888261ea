//! Point Quadtree.
//!
//! A non-intrusive spatial index: the tree borrows the caller's points and only stores
//! references to them. Every node covers an axis-aligned rectangle and holds at most `N`
//! references; a full leaf splits into four quadrants at its center.
//!
//! # Contracts:
//! - The point storage must outlive the tree (enforced by the `'a` lifetime).
//! - Two references to equal points are distinct entries; only the address is used as a key.
//!
//! ```
//! use point_quadtree::{Point, QuadTree};
//!
//! let points = vec![Point::new(0.0, 0.0), Point::new(100.0, 100.0), Point::new(25.0, 75.0)];
//! let tree = <QuadTree<_>>::from_points(&points).unwrap();
//! assert_eq!(tree.len(), 3);
//! ```
pub mod boundary;
pub mod error;
pub mod quadtree;

pub use boundary::Boundary;
pub use error::{Axis, QuadTreeError};
pub use quadtree::{QuadTree, Quadrant, DEFAULT_NODE_CAPACITY};

use std::fmt;
use std::ops::Deref;

/// Ordinate type of a point.
pub trait Scalar: Copy + PartialOrd + fmt::Display + fmt::Debug + Send + Sync {
    /// Center of `[lo, hi]`, without overflowing for any valid pair. Integers truncate towards zero.
    fn midpoint(lo: Self, hi: Self) -> Self;
}

macro_rules! impl_scalar_int {
    ($($t: ty => $wide: ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                #[inline]
                fn midpoint(lo: Self, hi: Self) -> Self {
                    ((lo as $wide + hi as $wide) / 2) as $t
                }
            }
        )*
    };
}

impl_scalar_int!(
    i8 => i16,
    i16 => i32,
    i32 => i64,
    i64 => i128,
    isize => i128,
    u8 => u16,
    u16 => u32,
    u32 => u64,
    u64 => u128,
    usize => u128,
);

impl Scalar for f32 {
    #[inline]
    fn midpoint(lo: Self, hi: Self) -> Self {
        let sum = lo + hi;
        if sum.is_finite() {
            sum / 2.0
        } else {
            // halving first is exact for operands this large
            lo / 2.0 + hi / 2.0
        }
    }
}

impl Scalar for f64 {
    #[inline]
    fn midpoint(lo: Self, hi: Self) -> Self {
        let sum = lo + hi;
        if sum.is_finite() {
            sum / 2.0
        } else {
            // halving first is exact for operands this large
            lo / 2.0 + hi / 2.0
        }
    }
}

/// Read access to the two components of an externally owned point.
pub trait Ordinates {
    type Scalar: Scalar;

    fn x(&self) -> Self::Scalar;
    fn y(&self) -> Self::Scalar;
}

impl<S: Scalar> Ordinates for [S; 2] {
    type Scalar = S;

    fn x(&self) -> S {
        self[0]
    }
    fn y(&self) -> S {
        self[1]
    }
}

impl<S: Scalar> Ordinates for (S, S) {
    type Scalar = S;

    fn x(&self) -> S {
        self.0
    }
    fn y(&self) -> S {
        self.1
    }
}

impl<'b, T: Ordinates + ?Sized> Ordinates for &'b T {
    type Scalar = T::Scalar;

    fn x(&self) -> Self::Scalar {
        (**self).x()
    }
    fn y(&self) -> Self::Scalar {
        (**self).y()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Point<S = f32>(pub [S; 2]);

impl<S> Deref for Point<S> {
    type Target = [S; 2];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> Point<S> {
    pub fn new(x: S, y: S) -> Self {
        Self([x, y])
    }
}

impl<S: Scalar> Ordinates for Point<S> {
    type Scalar = S;

    fn x(&self) -> S {
        self.0[0]
    }
    fn y(&self) -> S {
        self.0[1]
    }
}

impl<S: fmt::Display> fmt::Display for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.0[0], self.0[1])
    }
}
