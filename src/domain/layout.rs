//! 2D layout: leaves get consecutive horizontal slots, internal nodes sit at
//! the mean of their children, and every level is one `y_spacing` lower.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::{instrument, trace};

use crate::domain::node::TreeNode;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Coordinate of one node together with its payload, so a renderer does not
/// have to walk the tree again to label it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<'a, P> {
    pub point: Point,
    pub payload: Option<&'a P>,
}

/// Node identifier → placement.
pub type Positions<'a, I, P> = HashMap<I, Placement<'a, P>>;

/// Axis-aligned extent of a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Compute a placement for every node under `root`.
///
/// * `y = depth * y_spacing`, root at depth 0.
/// * The k-th leaf in left-to-right post-order (k from 0) gets
///   `x = k * x_spacing`.
/// * An internal node gets the unweighted mean of its children's `x`.
///
/// The traversal is iterative, so arbitrarily deep trees are fine.
#[instrument(level = "debug", skip(root))]
pub fn compute_positions<I, P>(
    root: &TreeNode<I, P>,
    x_spacing: f64,
    y_spacing: f64,
) -> Positions<'_, I, P>
where
    I: Eq + Hash + Clone,
{
    let mut positions: Positions<'_, I, P> = HashMap::new();
    let mut next_leaf: usize = 0;

    for (node, depth) in root.iter_postorder() {
        let x = if node.is_leaf() {
            let x = next_leaf as f64 * x_spacing;
            next_leaf += 1;
            x
        } else {
            let sum: f64 = node
                .children
                .iter()
                .filter_map(|child| positions.get(&child.id))
                .map(|placement| placement.point.x)
                .sum();
            sum / node.children.len() as f64
        };
        let y = depth as f64 * y_spacing;

        positions.insert(
            node.id.clone(),
            Placement {
                point: Point::new(x, y),
                payload: node.payload.as_ref(),
            },
        );
    }

    trace!(nodes = positions.len(), leaves = next_leaf, "computed positions");
    positions
}

/// Smallest box containing every placed point; `None` for an empty layout.
pub fn bounds<I, P>(positions: &Positions<'_, I, P>) -> Option<Bounds> {
    let mut points = positions.values().map(|placement| placement.point);
    let first = points.next()?;
    Some(points.fold(
        Bounds {
            min: first,
            max: first,
        },
        |acc, p| Bounds {
            min: Point::new(acc.min.x.min(p.x), acc.min.y.min(p.y)),
            max: Point::new(acc.max.x.max(p.x), acc.max.y.max(p.y)),
        },
    ))
}
