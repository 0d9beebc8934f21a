use crate::Point;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Storage for the rendered position of each node
pub trait PositionStore<N> {
    /// Current position of a node, `None` if it was never placed
    fn position(&self, node: N) -> Option<Point>;

    fn set_position(&mut self, node: N, position: Point);
}

impl<N: Eq + Hash> PositionStore<N> for HashMap<N, Point> {
    fn position(&self, node: N) -> Option<Point> {
        self.get(&node).copied()
    }

    fn set_position(&mut self, node: N, position: Point) {
        self.insert(node, position);
    }
}

impl<N: Ord> PositionStore<N> for BTreeMap<N, Point> {
    fn position(&self, node: N) -> Option<Point> {
        self.get(&node).copied()
    }

    fn set_position(&mut self, node: N, position: Point) {
        self.insert(node, position);
    }
}
