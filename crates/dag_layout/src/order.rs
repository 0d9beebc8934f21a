/// Strategy deciding the order in which nodes of a frontier are visited
///
/// The layering is only reproducible if this order is; it also decides which
/// node gets released first when a cycle blocks the sweep.
pub trait TraversalOrder<N> {
    /// Reorder `nodes` in place
    fn arrange(&self, nodes: &mut [N]);
}

/// Visit nodes sorted by their identifier
#[derive(Debug, Clone, Copy, Default)]
pub struct ByIdentifier;

impl<N: Ord> TraversalOrder<N> for ByIdentifier {
    fn arrange(&self, nodes: &mut [N]) {
        nodes.sort_unstable();
    }
}

/// Keep whatever order the graph yields
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOrder;

impl<N> TraversalOrder<N> for GraphOrder {
    fn arrange(&self, _nodes: &mut [N]) {}
}

// Blanket implementation for closures
impl<N, F> TraversalOrder<N> for F
where
    F: Fn(&mut [N]),
{
    fn arrange(&self, nodes: &mut [N]) {
        self(nodes)
    }
}
