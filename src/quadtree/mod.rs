mod render;

pub use render::Nodes;

use crate::{Boundary, Ordinates, Point, QuadTreeError};
use arrayvec::ArrayVec;

/// Points a leaf holds before it splits, unless chosen otherwise.
pub const DEFAULT_NODE_CAPACITY: usize = 4;

type Children<'a, P, const N: usize> = Option<Box<[QuadTree<'a, P, N>; 4]>>;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Quadrant {
    NorthWest = 0,
    NorthEast = 1,
    SouthEast = 2,
    SouthWest = 3,
}

impl Quadrant {
    /// Order in which an internal node offers an incoming point to its children
    pub const INSERTION_ORDER: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Order in which a splitting node hands its points down. Also the rendering order.
    pub const REDISTRIBUTION_ORDER: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthEast,
        Quadrant::SouthWest,
    ];
}

/// A node of a point quadtree. The root node is the tree.
///
/// Leaves hold up to `N` references into the caller's point storage. A leaf receiving one more
/// point becomes an internal node with four children and holds no points from then on.
#[derive(Debug, Clone)]
pub struct QuadTree<'a, P, const N: usize = DEFAULT_NODE_CAPACITY>
where
    P: Ordinates,
{
    boundary: Boundary<P::Scalar>,
    // depth from the root, only used for rendering
    level: u32,

    children: Children<'a, P, N>,

    // ordered by address
    points: ArrayVec<&'a P, N>,
}

impl<'a, P, const N: usize> QuadTree<'a, P, N>
where
    P: Ordinates,
{
    /// Empty tree covering `boundary`.
    pub fn new(boundary: Boundary<P::Scalar>) -> Self {
        assert!(N > 0, "node capacity must be at least 1");
        Self::leaf(boundary, 0)
    }

    pub fn with_bounds(
        upper_left: Point<P::Scalar>,
        lower_right: Point<P::Scalar>,
    ) -> Result<Self, QuadTreeError> {
        Boundary::new(upper_left, lower_right).map(Self::new)
    }

    /// Tree covering `boundary`, populated from `points`.
    /// Returns the tree and the number of points that fell within `boundary`.
    pub fn with_points<It>(
        boundary: Boundary<P::Scalar>,
        points: It,
    ) -> Result<(Self, usize), QuadTreeError>
    where
        It: IntoIterator<Item = &'a P>,
    {
        let mut tree = Self::new(boundary);
        let accepted = tree.extend(points)?;
        Ok((tree, accepted))
    }

    /// Build a tree over the tight bounding box of `points`, inserting them in order.
    ///
    /// `P: Sync` is needed for the parallel bounding box scan. Point types that are not `Sync`
    /// can be indexed through [`QuadTree::with_points`] with an explicit boundary.
    pub fn from_points(points: &'a [P]) -> Result<Self, QuadTreeError>
    where
        P: Sync,
    {
        // the minimum bounding box keeps the tree balanced for the given input
        let boundary = Boundary::enclosing(points)?;
        let mut tree = Self::new(boundary);
        tree.extend(points.iter())?;
        tracing::debug!(points = points.len(), boundary = %boundary, "built quadtree");
        Ok(tree)
    }

    pub fn from_iterator<It>(it: It) -> Result<Self, QuadTreeError>
    where
        It: IntoIterator<Item = &'a P>,
        P: Sync,
    {
        let points = it.into_iter().collect::<Vec<_>>();
        let boundary = Boundary::enclosing(&points)?;
        let mut tree = Self::new(boundary);
        tree.extend(points.iter().copied())?;
        tracing::debug!(points = points.len(), boundary = %boundary, "built quadtree");
        Ok(tree)
    }

    fn leaf(boundary: Boundary<P::Scalar>, level: u32) -> Self {
        Self {
            boundary,
            level,
            children: None,
            points: ArrayVec::new(),
        }
    }

    /// Insert every point in order. Returns the number of accepted points.
    /// Stops at the first failing insertion.
    pub fn extend<It>(&mut self, it: It) -> Result<usize, QuadTreeError>
    where
        It: IntoIterator<Item = &'a P>,
    {
        let mut accepted = 0;
        for point in it {
            if self.insert(point)? {
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    /// Return whether the point was accepted by this node or one of its descendants.
    ///
    /// Points outside the boundary are rejected without side effects. A reference already held
    /// by the receiving leaf is accepted but not stored twice. Deduplication is per leaf only: a
    /// point on an edge shared by SW and SE is handed to SE when its leaf splits but routed to SW
    /// when inserted again, and is then held by both.
    ///
    /// Fails with [`QuadTreeError::DegenerateBoundary`] when a full leaf can not be split any
    /// further, e.g. after more than `N` coincident points. The failing node is left untouched.
    pub fn insert(&mut self, point: &'a P) -> Result<bool, QuadTreeError> {
        if !self.boundary.contains(point) {
            return Ok(false);
        }

        let boundary = self.boundary;
        let children = match self.children.as_deref_mut() {
            Some(children) => children,
            None => {
                let key = point as *const P;
                match self.points.binary_search_by_key(&key, |p| *p as *const P) {
                    Ok(_) => return Ok(true),
                    Err(ind) if !self.points.is_full() => {
                        self.points.insert(ind, point);
                        return Ok(true);
                    }
                    Err(_) => self.split()?,
                }
            }
        };

        if Self::offer(children, &Quadrant::INSERTION_ORDER, point)? {
            return Ok(true);
        }
        unreachable!("no quadrant of {} accepted a contained point", boundary);
    }

    /// Try the children in `order`, stopping at the first one accepting the point.
    fn offer(
        children: &mut [Self; 4],
        order: &[Quadrant; 4],
        point: &'a P,
    ) -> Result<bool, QuadTreeError> {
        for quadrant in order.iter() {
            if children[*quadrant as usize].insert(point)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Turn this leaf into an internal node and move its points into the new children.
    fn split(&mut self) -> Result<&mut [Self; 4], QuadTreeError> {
        debug_assert!(self.children.is_none());

        // validates every quadrant before anything is touched
        let [nw, ne, se, sw] = self.boundary.split()?;
        let level = self.level + 1;
        let mut children = Box::new([
            Self::leaf(nw, level),
            Self::leaf(ne, level),
            Self::leaf(se, level),
            Self::leaf(sw, level),
        ]);
        tracing::trace!(level = self.level, boundary = %self.boundary, "split");

        for &point in self.points.iter() {
            if !Self::offer(&mut children, &Quadrant::REDISTRIBUTION_ORDER, point)? {
                unreachable!("split quadrants of {} do not cover a held point", self.boundary);
            }
        }
        self.points.clear();

        Ok(&mut **self.children.insert(children))
    }

    /// Return whether this exact reference is held anywhere in the tree.
    pub fn contains(&self, point: &P) -> bool {
        self.find(point).is_some()
    }

    /// Leaf holding this exact reference, if any.
    pub fn find(&self, point: &P) -> Option<&Self> {
        if !self.boundary.contains(point) {
            return None;
        }

        match self.children.as_deref() {
            Some(children) => children.iter().find_map(|child| child.find(point)),
            None => self
                .points
                .iter()
                .find(|p| std::ptr::eq(**p, point))
                .map(|_| self),
        }
    }

    /// Total number of points held by all leaves.
    pub fn len(&self) -> usize {
        self.nodes().map(|node| node.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deepest level below this node.
    pub fn depth(&self) -> u32 {
        self.nodes().map(|node| node.level).max().unwrap_or(self.level) - self.level
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn boundary(&self) -> &Boundary<P::Scalar> {
        &self.boundary
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Points held directly by this node. Always empty for internal nodes.
    pub fn points(&self) -> &[&'a P] {
        &self.points
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Children in `[NW, NE, SE, SW]` order.
    pub fn children(&self) -> Option<&[Self; 4]> {
        self.children.as_deref()
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<&Self> {
        self.children().map(|children| &children[quadrant as usize])
    }
}
