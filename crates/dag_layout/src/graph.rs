use petgraph::graph::{IndexType, NodeIndex};
use petgraph::graphmap::{GraphMap, NodeTrait};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, NodeIndexable};
use petgraph::{Directed, Direction, Graph};
use std::fmt;
use std::hash::Hash;

/// Read-only view on the topology of a directed graph
///
/// Every edge counts once per endpoint: parallel edges show up repeatedly in
/// [`GraphView::successors`] and [`GraphView::incident`], and a self-loop
/// makes a node its own predecessor.
pub trait GraphView {
    /// Stable node identity, also used as the default traversal order
    type NodeId: Copy + Ord + Hash + fmt::Debug;

    /// All nodes currently in the graph
    fn node_ids(&self) -> Vec<Self::NodeId>;

    /// Number of nodes in the graph
    fn node_count(&self) -> usize;

    /// Upper bound of the index space used by [`GraphView::node_at`]
    fn node_bound(&self) -> usize {
        self.node_count()
    }

    /// Node stored at `index`, if any
    fn node_at(&self, index: usize) -> Option<Self::NodeId>;

    /// Whether the node is still part of the graph
    fn contains_node(&self, node: Self::NodeId) -> bool;

    /// Number of incoming edges
    fn in_degree(&self, node: Self::NodeId) -> usize;

    /// Target of every outgoing edge
    fn successors(&self, node: Self::NodeId) -> Vec<Self::NodeId>;

    /// Opposite endpoint of every incoming and outgoing edge
    fn incident(&self, node: Self::NodeId) -> Vec<Self::NodeId>;
}

impl<N, E, Ix> GraphView for Graph<N, E, Directed, Ix>
where
    Ix: IndexType,
{
    type NodeId = NodeIndex<Ix>;

    fn node_ids(&self) -> Vec<Self::NodeId> {
        self.node_indices().collect()
    }

    fn node_count(&self) -> usize {
        Graph::node_count(self)
    }

    fn node_at(&self, index: usize) -> Option<Self::NodeId> {
        (index < Graph::node_count(self)).then(|| NodeIndex::new(index))
    }

    fn contains_node(&self, node: Self::NodeId) -> bool {
        self.node_weight(node).is_some()
    }

    fn in_degree(&self, node: Self::NodeId) -> usize {
        self.edges_directed(node, Direction::Incoming).count()
    }

    fn successors(&self, node: Self::NodeId) -> Vec<Self::NodeId> {
        self.edges_directed(node, Direction::Outgoing)
            .map(|edge| edge.target())
            .collect()
    }

    fn incident(&self, node: Self::NodeId) -> Vec<Self::NodeId> {
        let incoming = self
            .edges_directed(node, Direction::Incoming)
            .map(|edge| edge.source())
            // self-loops were already reported as outgoing
            .filter(|&source| source != node);
        self.successors(node).into_iter().chain(incoming).collect()
    }
}

impl<N, E, Ix> GraphView for StableGraph<N, E, Directed, Ix>
where
    Ix: IndexType,
{
    type NodeId = NodeIndex<Ix>;

    fn node_ids(&self) -> Vec<Self::NodeId> {
        self.node_indices().collect()
    }

    fn node_count(&self) -> usize {
        StableGraph::node_count(self)
    }

    fn node_bound(&self) -> usize {
        NodeIndexable::node_bound(self)
    }

    fn node_at(&self, index: usize) -> Option<Self::NodeId> {
        let node = NodeIndex::new(index);
        StableGraph::contains_node(self, node).then_some(node)
    }

    fn contains_node(&self, node: Self::NodeId) -> bool {
        StableGraph::contains_node(self, node)
    }

    fn in_degree(&self, node: Self::NodeId) -> usize {
        self.edges_directed(node, Direction::Incoming).count()
    }

    fn successors(&self, node: Self::NodeId) -> Vec<Self::NodeId> {
        self.edges_directed(node, Direction::Outgoing)
            .map(|edge| edge.target())
            .collect()
    }

    fn incident(&self, node: Self::NodeId) -> Vec<Self::NodeId> {
        let incoming = self
            .edges_directed(node, Direction::Incoming)
            .map(|edge| edge.source())
            .filter(|&source| source != node);
        self.successors(node).into_iter().chain(incoming).collect()
    }
}

// GraphMap keeps at most one edge per ordered pair, and a self-loop is stored
// once, so self-loops are counted explicitly instead of trusting the
// direction flags of the adjacency list.
impl<N, E> GraphView for GraphMap<N, E, Directed>
where
    N: NodeTrait + fmt::Debug,
{
    type NodeId = N;

    fn node_ids(&self) -> Vec<Self::NodeId> {
        self.nodes().collect()
    }

    fn node_count(&self) -> usize {
        GraphMap::node_count(self)
    }

    fn node_at(&self, index: usize) -> Option<Self::NodeId> {
        self.nodes().nth(index)
    }

    fn contains_node(&self, node: Self::NodeId) -> bool {
        GraphMap::contains_node(self, node)
    }

    fn in_degree(&self, node: Self::NodeId) -> usize {
        let others = self
            .neighbors_directed(node, Direction::Incoming)
            .filter(|&pred| pred != node)
            .count();
        others + usize::from(self.contains_edge(node, node))
    }

    fn successors(&self, node: Self::NodeId) -> Vec<Self::NodeId> {
        let mut successors: Vec<_> = self
            .neighbors_directed(node, Direction::Outgoing)
            .filter(|&succ| succ != node)
            .collect();
        if self.contains_edge(node, node) {
            successors.push(node);
        }
        successors
    }

    fn incident(&self, node: Self::NodeId) -> Vec<Self::NodeId> {
        let incoming = self
            .neighbors_directed(node, Direction::Incoming)
            .filter(|&pred| pred != node);
        self.successors(node).into_iter().chain(incoming).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graphmap::DiGraphMap;
    use petgraph::stable_graph::StableDiGraph;

    #[test]
    fn graph_counts_parallel_edges_and_self_loops() {
        let mut graph = Graph::<(), ()>::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_edge(a, b, ());
        graph.add_edge(a, b, ());
        graph.add_edge(b, b, ());

        assert_eq!(GraphView::in_degree(&graph, b), 3);
        assert_eq!(GraphView::successors(&graph, a), vec![b, b]);

        let mut incident = GraphView::incident(&graph, b);
        incident.sort();
        assert_eq!(incident, vec![a, a, b]);
    }

    #[test]
    fn graph_node_at_is_bounded() {
        let mut graph = Graph::<(), ()>::new();
        let a = graph.add_node(());
        assert_eq!(GraphView::node_at(&graph, 0), Some(a));
        assert_eq!(GraphView::node_at(&graph, 1), None);
    }

    #[test]
    fn stable_graph_skips_holes() {
        let mut graph = StableDiGraph::<(), ()>::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.remove_node(b);

        assert_eq!(GraphView::node_count(&graph), 2);
        assert_eq!(GraphView::node_bound(&graph), 3);
        assert_eq!(GraphView::node_at(&graph, 0), Some(a));
        assert_eq!(GraphView::node_at(&graph, 1), None);
        assert_eq!(GraphView::node_at(&graph, 2), Some(c));
        assert!(!GraphView::contains_node(&graph, b));
    }

    #[test]
    fn graph_map_self_loop_counts_once_each_way() {
        let mut graph = DiGraphMap::<u32, ()>::new();
        graph.add_edge(1, 2, ());
        graph.add_edge(2, 2, ());
        graph.add_edge(2, 3, ());

        assert_eq!(GraphView::in_degree(&graph, 2), 2);
        assert_eq!(GraphView::in_degree(&graph, 1), 0);

        let mut successors = GraphView::successors(&graph, 2);
        successors.sort();
        assert_eq!(successors, vec![2, 3]);

        let mut incident = GraphView::incident(&graph, 2);
        incident.sort();
        assert_eq!(incident, vec![1, 2, 3]);
    }
}
