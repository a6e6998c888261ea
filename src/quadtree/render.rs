use super::{QuadTree, Quadrant};
use crate::Ordinates;
use std::fmt;

/// Pre-order traversal of a tree, visiting children in `[NW, NE, SE, SW]` order.
pub struct Nodes<'t, 'a, P, const N: usize>
where
    P: Ordinates,
{
    stack: Vec<&'t QuadTree<'a, P, N>>,
}

impl<'t, 'a, P, const N: usize> Iterator for Nodes<'t, 'a, P, N>
where
    P: Ordinates,
{
    type Item = &'t QuadTree<'a, P, N>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack.extend(
                Quadrant::REDISTRIBUTION_ORDER
                    .iter()
                    .rev()
                    .map(|q| &children[*q as usize]),
            );
        }
        Some(node)
    }
}

impl<'a, P, const N: usize> QuadTree<'a, P, N>
where
    P: Ordinates,
{
    pub fn nodes(&self) -> Nodes<'_, 'a, P, N> {
        Nodes { stack: vec![self] }
    }

    /// Depth-indented dump of every node's boundary and held points.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn feed_spaces(level: u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for _ in 0..level {
        f.write_str("  ")?;
    }
    Ok(())
}

impl<'a, P, const N: usize> fmt::Display for QuadTree<'a, P, N>
where
    P: Ordinates,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.nodes() {
            feed_spaces(node.level(), f)?;
            write!(f, "Node {} => ( ", node.boundary())?;
            for p in node.points() {
                write!(f, "[{} {}] ", p.x(), p.y())?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}
