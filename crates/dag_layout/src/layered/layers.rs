use super::{LayoutError, LayoutState};
use crate::{GraphView, TraversalOrder};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Outcome of the cycle-breaking pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleBreak<N> {
    /// Every node of the graph, in the order it got resolved
    pub resolution_order: Vec<N>,

    /// Nodes whose pending predecessors were disregarded to escape a cycle,
    /// in release order
    pub released: Vec<N>,
}

/// Layer and slot of every node, before any randomization
#[derive(Debug, Clone)]
pub struct Layering<N> {
    pub states: HashMap<N, LayoutState>,

    /// Nodes of each layer, by slot
    pub layers: Vec<Vec<N>>,

    /// Largest number of nodes in a single layer
    pub max_slot: usize,

    /// Nodes released to break cycles during layering
    pub released: Vec<N>,
}

/// Frontiers visited by a sweep, one per layer
struct Sweep<N> {
    frontiers: Vec<Vec<N>>,
    released: Vec<N>,
}

/// Fresh layout state for every node, with the true in-degree as counter
pub(crate) fn init_states<G>(graph: &G) -> HashMap<G::NodeId, LayoutState>
where
    G: GraphView,
{
    graph
        .node_ids()
        .into_iter()
        .map(|node| (node, LayoutState::new(graph.in_degree(node))))
        .collect()
}

/// Set every counter back to the number of predecessors of its node
pub(crate) fn reset_unresolved_in_degree<G>(
    graph: &G,
    states: &mut HashMap<G::NodeId, LayoutState>,
) -> Result<(), LayoutError<G::NodeId>>
where
    G: GraphView,
{
    for node in graph.node_ids() {
        let state = states
            .get_mut(&node)
            .ok_or(LayoutError::MissingLayoutState(node))?;
        state.unresolved_in_degree = graph.in_degree(node);
    }
    Ok(())
}

/// In-degree driven breadth-first sweep
///
/// A node joins the next frontier once all of its predecessors have been
/// visited. When the frontier runs dry while nodes are left, those nodes sit
/// on a cycle: the first of them in traversal order gets one pending
/// predecessor disregarded and seeds a frontier of its own. The choice only
/// depends on the graph, the order and the counters, so running the sweep
/// twice from the same counters releases the same nodes.
fn frontier_sweep<G, O>(
    graph: &G,
    order: &O,
    states: &mut HashMap<G::NodeId, LayoutState>,
) -> Result<Sweep<G::NodeId>, LayoutError<G::NodeId>>
where
    G: GraphView,
    O: TraversalOrder<G::NodeId> + ?Sized,
{
    let mut nodes = graph.node_ids();
    order.arrange(&mut nodes);

    let mut frontier = Vec::new();
    for &node in &nodes {
        let state = states
            .get(&node)
            .ok_or(LayoutError::MissingLayoutState(node))?;
        if state.unresolved_in_degree == 0 {
            frontier.push(node);
        }
    }

    let mut resolved: HashSet<G::NodeId> = HashSet::with_capacity(nodes.len());
    let mut frontiers = Vec::new();
    let mut released = Vec::new();
    let mut cursor = 0;

    loop {
        while !frontier.is_empty() {
            resolved.extend(frontier.iter().copied());

            let mut next = Vec::new();
            for &node in &frontier {
                for successor in graph.successors(node) {
                    let state = states
                        .get_mut(&successor)
                        .ok_or(LayoutError::MissingLayoutState(successor))?;
                    if state.resolve_predecessor() && !resolved.contains(&successor) {
                        next.push(successor);
                    }
                }
            }
            order.arrange(&mut next);

            frontiers.push(std::mem::replace(&mut frontier, next));
        }

        // Resolved nodes never become unresolved again, so the cursor only
        // moves forward
        while cursor < nodes.len() && resolved.contains(&nodes[cursor]) {
            cursor += 1;
        }
        let Some(&stuck) = nodes.get(cursor) else {
            break;
        };

        let state = states
            .get_mut(&stuck)
            .ok_or(LayoutError::MissingLayoutState(stuck))?;
        state.ignore_loop_edge();
        released.push(stuck);
        frontier.push(stuck);
    }

    Ok(Sweep {
        frontiers,
        released,
    })
}

/// Find an order in which every node can be resolved, disregarding
/// predecessors where cycles would block
///
/// Counters are left as the sweep leaves them; reset them before layering.
pub fn break_cycles<G, O>(
    graph: &G,
    order: &O,
    states: &mut HashMap<G::NodeId, LayoutState>,
) -> Result<CycleBreak<G::NodeId>, LayoutError<G::NodeId>>
where
    G: GraphView,
    O: TraversalOrder<G::NodeId> + ?Sized,
{
    let sweep = frontier_sweep(graph, order, states)?;
    for node in &sweep.released {
        warn!("Cycle detected, disregarding one predecessor of {node:?}");
    }

    Ok(CycleBreak {
        resolution_order: sweep.frontiers.concat(),
        released: sweep.released,
    })
}

/// Assign layers and slots from the true in-degrees
///
/// Each frontier becomes a layer, slots follow the traversal order. Returns
/// the nodes of each layer and the released nodes.
pub fn assign_layers<G, O>(
    graph: &G,
    order: &O,
    states: &mut HashMap<G::NodeId, LayoutState>,
) -> Result<(Vec<Vec<G::NodeId>>, Vec<G::NodeId>), LayoutError<G::NodeId>>
where
    G: GraphView,
    O: TraversalOrder<G::NodeId> + ?Sized,
{
    let sweep = frontier_sweep(graph, order, states)?;

    for (layer, nodes) in sweep.frontiers.iter().enumerate() {
        for (slot, node) in nodes.iter().enumerate() {
            let state = states
                .get_mut(node)
                .ok_or(LayoutError::MissingLayoutState(*node))?;
            state.layer = layer;
            state.slot = slot;
        }
    }

    Ok((sweep.frontiers, sweep.released))
}

/// Break cycles, then layer the graph from scratch
pub fn compute_layering<G, O>(
    graph: &G,
    order: &O,
) -> Result<Layering<G::NodeId>, LayoutError<G::NodeId>>
where
    G: GraphView,
    O: TraversalOrder<G::NodeId> + ?Sized,
{
    let mut states = init_states(graph);

    let cycle_break = break_cycles(graph, order, &mut states)?;
    reset_unresolved_in_degree(graph, &mut states)?;
    let (layers, released) = assign_layers(graph, order, &mut states)?;
    debug_assert_eq!(cycle_break.released, released);

    let max_slot = layers.iter().map(Vec::len).max().unwrap_or(0);
    debug!(
        "Layered {} nodes into {} layers of at most {max_slot} slots, {} released",
        states.len(),
        layers.len(),
        released.len()
    );

    Ok(Layering {
        states,
        layers,
        max_slot,
        released,
    })
}
