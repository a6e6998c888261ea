use crate::{Axis, Ordinates, Point, QuadTreeError, Scalar};
use rayon::prelude::*;
use std::fmt;

/// Axis-aligned rectangle given by its upper left (minimum) and lower right (maximum) corners.
///
/// Containment is closed on both ends, so sibling quadrants share their edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary<S> {
    upper_left: Point<S>,
    lower_right: Point<S>,
}

impl<S: Scalar> Boundary<S> {
    pub fn new(upper_left: Point<S>, lower_right: Point<S>) -> Result<Self, QuadTreeError> {
        let boundary = Self {
            upper_left,
            lower_right,
        };
        boundary.validate()?;
        Ok(boundary)
    }

    /// Smallest boundary enclosing every point of the slice.
    pub fn enclosing<P>(points: &[P]) -> Result<Self, QuadTreeError>
    where
        P: Ordinates<Scalar = S> + Sync,
    {
        let first = points.first().ok_or(QuadTreeError::EmptyRange)?;
        let seed = [first.x(), first.y(), first.x(), first.y()];
        let [min_x, min_y, max_x, max_y] = points
            .par_iter()
            .map(|p| [p.x(), p.y(), p.x(), p.y()])
            .reduce(
                || seed,
                |a, b| {
                    [
                        lesser(a[0], b[0]),
                        lesser(a[1], b[1]),
                        greater(a[2], b[2]),
                        greater(a[3], b[3]),
                    ]
                },
            );
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    pub fn upper_left(&self) -> Point<S> {
        self.upper_left
    }

    pub fn lower_right(&self) -> Point<S> {
        self.lower_right
    }

    pub fn center(&self) -> Point<S> {
        let [fromx, fromy] = *self.upper_left;
        let [tox, toy] = *self.lower_right;
        Point::new(S::midpoint(fromx, tox), S::midpoint(fromy, toy))
    }

    /// Zero extent is checked on both axes before the corner order.
    pub fn validate(&self) -> Result<(), QuadTreeError> {
        let [fromx, fromy] = *self.upper_left;
        let [tox, toy] = *self.lower_right;

        // NaN compares unequal but has no extent either
        for &(axis, from, to) in &[(Axis::X, fromx, tox), (Axis::Y, fromy, toy)] {
            if from == to || from.partial_cmp(&to).is_none() {
                return Err(QuadTreeError::DegenerateBoundary { axis });
            }
        }
        for &(axis, from, to) in &[(Axis::X, fromx, tox), (Axis::Y, fromy, toy)] {
            if from > to {
                return Err(QuadTreeError::InvertedBoundary { axis });
            }
        }
        Ok(())
    }

    pub fn contains<P>(&self, point: &P) -> bool
    where
        P: Ordinates<Scalar = S> + ?Sized,
    {
        let (x, y) = (point.x(), point.y());

        self.upper_left[0] <= x
            && self.upper_left[1] <= y
            && x <= self.lower_right[0]
            && y <= self.lower_right[1]
    }

    /// Split at the center. Returns the quadrants in `[NW, NE, SE, SW]` order.
    ///
    /// Fails when a quadrant would have zero extent, which happens once the center can no
    /// longer be told apart from a corner.
    pub fn split(&self) -> Result<[Self; 4], QuadTreeError> {
        let [fromx, fromy] = *self.upper_left;
        let [tox, toy] = *self.lower_right;
        let center = self.center();
        let [cx, cy] = *center;

        let quadrants = [
            Self {
                upper_left: self.upper_left,
                lower_right: center,
            },
            Self {
                upper_left: Point::new(cx, fromy),
                lower_right: Point::new(tox, cy),
            },
            Self {
                upper_left: center,
                lower_right: self.lower_right,
            },
            Self {
                upper_left: Point::new(fromx, cy),
                lower_right: Point::new(cx, toy),
            },
        ];
        for q in quadrants.iter() {
            q.validate()?;
        }
        Ok(quadrants)
    }
}

impl<S: fmt::Display> fmt::Display for Boundary<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.upper_left, self.lower_right)
    }
}

fn lesser<S: PartialOrd>(a: S, b: S) -> S {
    if b < a {
        b
    } else {
        a
    }
}

fn greater<S: PartialOrd>(a: S, b: S) -> S {
    if b > a {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn rect(fromx: i32, fromy: i32, tox: i32, toy: i32) -> Result<Boundary<i32>, QuadTreeError> {
        Boundary::new(Point::new(fromx, fromy), Point::new(tox, toy))
    }

    #[test]
    fn degenerate_boundaries_are_rejected() {
        assert_eq!(
            rect(0, 0, 0, 5),
            Err(QuadTreeError::DegenerateBoundary { axis: Axis::X })
        );
        assert_eq!(
            rect(0, 3, 5, 3),
            Err(QuadTreeError::DegenerateBoundary { axis: Axis::Y })
        );
        // zero extent wins over inversion
        assert_eq!(
            rect(5, 3, 0, 3),
            Err(QuadTreeError::DegenerateBoundary { axis: Axis::Y })
        );
    }

    #[test]
    fn inverted_boundaries_are_rejected() {
        assert_eq!(
            rect(10, 0, 0, 5),
            Err(QuadTreeError::InvertedBoundary { axis: Axis::X })
        );
        assert_eq!(
            rect(0, 10, 5, 0),
            Err(QuadTreeError::InvertedBoundary { axis: Axis::Y })
        );
    }

    #[test]
    fn nan_boundary_is_degenerate() {
        let res = Boundary::new(Point::new(0.0f32, std::f32::NAN), Point::new(1.0, 1.0));
        assert_eq!(res, Err(QuadTreeError::DegenerateBoundary { axis: Axis::Y }));
    }

    #[test]
    fn contains_is_closed_on_both_ends() {
        let b = rect(0, 0, 10, 20).unwrap();

        assert!(b.contains(&[0, 0]));
        assert!(b.contains(&[10, 20]));
        assert!(b.contains(&(10, 0)));
        assert!(b.contains(&Point::new(5, 5)));
        assert!(!b.contains(&[11, 5]));
        assert!(!b.contains(&[5, -1]));
    }

    #[test]
    fn split_quadrants() {
        let b = Boundary::new(Point::new(0.0f64, 0.0), Point::new(100.0, 50.0)).unwrap();
        let [nw, ne, se, sw] = b.split().unwrap();

        assert_eq!(nw.upper_left(), Point::new(0.0, 0.0));
        assert_eq!(nw.lower_right(), Point::new(50.0, 25.0));
        assert_eq!(ne.upper_left(), Point::new(50.0, 0.0));
        assert_eq!(ne.lower_right(), Point::new(100.0, 25.0));
        assert_eq!(se.upper_left(), Point::new(50.0, 25.0));
        assert_eq!(se.lower_right(), Point::new(100.0, 50.0));
        assert_eq!(sw.upper_left(), Point::new(0.0, 25.0));
        assert_eq!(sw.lower_right(), Point::new(50.0, 50.0));
    }

    #[test]
    fn integer_split_truncates() {
        let b = rect(-3, 0, 0, 7).unwrap();
        // (-3 + 0) / 2 and (0 + 7) / 2 truncate towards zero
        assert_eq!(b.center(), Point::new(-1, 3));

        let b = rect(0, 0, 1, 1).unwrap();
        assert_eq!(
            b.split(),
            Err(QuadTreeError::DegenerateBoundary { axis: Axis::X })
        );
    }

    #[test]
    fn integer_midpoint_does_not_overflow() {
        let b = rect(std::i32::MAX - 2, std::i32::MIN, std::i32::MAX, std::i32::MAX).unwrap();
        assert_eq!(b.center(), Point::new(std::i32::MAX - 1, 0));
    }

    #[test]
    fn float_midpoint_does_not_overflow() {
        // lo + hi is 2^128, past f32::MAX
        let lo = 2f32.powi(126);
        let b = Boundary::new(Point::new(lo, 0.0), Point::new(3.0 * lo, 1.0)).unwrap();
        assert_eq!(b.center(), Point::new(2.0 * lo, 0.5));

        let [_, ne, _, _] = b.split().unwrap();
        assert_eq!(ne.upper_left(), Point::new(2.0 * lo, 0.0));

        let b = Boundary::new(
            Point::new(-std::f64::MAX, -1.0),
            Point::new(std::f64::MAX, 1.0),
        )
        .unwrap();
        assert_eq!(b.center(), Point::new(0.0, 0.0));
        assert!(b.split().is_ok());
    }

    #[test]
    fn split_covers_parent() {
        let mut rng = rand::thread_rng();

        for _ in 0..64 {
            let fromx = rng.gen_range(-1000, 1000);
            let fromy = rng.gen_range(-1000, 1000);
            let b = rect(
                fromx,
                fromy,
                fromx + rng.gen_range(2, 100),
                fromy + rng.gen_range(2, 100),
            )
            .unwrap();
            let quadrants = b.split().unwrap();
            let [tox, toy] = *b.lower_right();

            for x in fromx..=tox {
                for y in fromy..=toy {
                    assert!(
                        quadrants.iter().any(|q| q.contains(&[x, y])),
                        "[{} {}] not covered by the split of {}",
                        x,
                        y,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn enclosing_is_tight() {
        let points = vec![[3.0f32, 9.0], [-1.0, 4.0], [7.5, -2.0], [0.0, 0.0]];
        let b = Boundary::enclosing(&points).unwrap();

        assert_eq!(b.upper_left(), Point::new(-1.0, -2.0));
        assert_eq!(b.lower_right(), Point::new(7.5, 9.0));
    }

    #[test]
    fn enclosing_empty_range() {
        let points: Vec<[f32; 2]> = vec![];
        assert_eq!(
            Boundary::enclosing(&points),
            Err(QuadTreeError::EmptyRange)
        );
    }

    #[test]
    fn enclosing_collinear_points_is_degenerate() {
        let points = vec![[3, 1], [3, 4], [3, 9]];
        assert_eq!(
            Boundary::enclosing(&points),
            Err(QuadTreeError::DegenerateBoundary { axis: Axis::X })
        );
    }
}
