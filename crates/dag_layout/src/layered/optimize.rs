use super::{LayoutError, LayoutState, SlotGrid};
use crate::{GraphView, RandomSource};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Counters of an optimizer pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub trials: usize,

    /// Trials whose random index did not hit a node
    pub skipped: usize,

    pub accepted: usize,
}

enum Trial {
    Skipped,
    Rejected,
    Accepted,
}

/// Move every node to a random slot of its layer, swapping with the occupant
pub(crate) fn shuffle_slots<N, R>(
    nodes: &[N],
    grid: &mut SlotGrid<N>,
    states: &mut HashMap<N, LayoutState>,
    rng: &mut R,
) -> Result<(), LayoutError<N>>
where
    N: Copy + Eq + Hash + fmt::Debug,
    R: RandomSource + ?Sized,
{
    for &node in nodes {
        let state = states
            .get(&node)
            .ok_or(LayoutError::MissingLayoutState(node))?;
        let (layer, slot) = (state.layer, state.slot);
        let random_slot = rng.below(grid.max_slot());
        grid.swap(layer, slot, random_slot, states)?;
    }
    Ok(())
}

/// Run `trials` random swap attempts
pub(crate) fn improve_slots<G, R>(
    graph: &G,
    grid: &mut SlotGrid<G::NodeId>,
    states: &mut HashMap<G::NodeId, LayoutState>,
    rng: &mut R,
    trials: usize,
) -> Result<PassStats, LayoutError<G::NodeId>>
where
    G: GraphView,
    R: RandomSource + ?Sized,
{
    let mut stats = PassStats {
        trials,
        ..Default::default()
    };
    for _ in 0..trials {
        match improve_slot(graph, grid, states, rng)? {
            Trial::Skipped => stats.skipped += 1,
            Trial::Rejected => {}
            Trial::Accepted => stats.accepted += 1,
        }
    }
    Ok(stats)
}

/// Pick a random node and a random slot of its layer, and swap with the
/// occupant if the summed relative improvement of both is positive
///
/// One side may get worse as long as the other gains more, relatively.
fn improve_slot<G, R>(
    graph: &G,
    grid: &mut SlotGrid<G::NodeId>,
    states: &mut HashMap<G::NodeId, LayoutState>,
    rng: &mut R,
) -> Result<Trial, LayoutError<G::NodeId>>
where
    G: GraphView,
    R: RandomSource + ?Sized,
{
    let index = rng.below(graph.node_bound());
    let Some(node) = graph.node_at(index) else {
        return Ok(Trial::Skipped);
    };
    let state = states
        .get(&node)
        .ok_or(LayoutError::MissingLayoutState(node))?;
    let (layer, slot) = (state.layer, state.slot);

    let other_slot = rng.below(grid.max_slot());
    let other = grid.get(layer, other_slot);
    if let Some(other) = other {
        if !graph.contains_node(other) {
            return Err(LayoutError::StaleGrid {
                layer,
                slot: other_slot,
                node: other,
            });
        }
    }

    let gain = improvement(graph, states, Some(node), other_slot)?
        + improvement(graph, states, other, slot)?;

    if gain > 0.0 {
        grid.swap(layer, slot, other_slot, states)?;
        Ok(Trial::Accepted)
    } else {
        Ok(Trial::Rejected)
    }
}

/// Relative gain `(current - moved) / current` of moving `node` to `slot`
///
/// Zero for an empty cell or a node without edge length.
fn improvement<G>(
    graph: &G,
    states: &HashMap<G::NodeId, LayoutState>,
    node: Option<G::NodeId>,
    slot: usize,
) -> Result<f64, LayoutError<G::NodeId>>
where
    G: GraphView,
{
    let Some(node) = node else {
        return Ok(0.0);
    };
    let current_slot = states
        .get(&node)
        .ok_or(LayoutError::MissingLayoutState(node))?
        .slot;

    let current = distance_sum(graph, states, node, current_slot)?;
    if current == 0.0 {
        return Ok(0.0);
    }
    let moved = distance_sum(graph, states, node, slot)?;
    Ok((current - moved) / current)
}

/// Summed length of all edges of `node` if it sat at `slot`
///
/// Lengths are measured in grid units, not in rendered distance.
fn distance_sum<G>(
    graph: &G,
    states: &HashMap<G::NodeId, LayoutState>,
    node: G::NodeId,
    slot: usize,
) -> Result<f64, LayoutError<G::NodeId>>
where
    G: GraphView,
{
    let layer = states
        .get(&node)
        .ok_or(LayoutError::MissingLayoutState(node))?
        .layer;

    let mut sum = 0.0;
    for opposite in graph.incident(node) {
        let other = states
            .get(&opposite)
            .ok_or(LayoutError::MissingLayoutState(opposite))?;
        let dx = slot as f64 - other.slot as f64;
        let dy = layer as f64 - other.layer as f64;
        sum += (dx * dx + dy * dy).sqrt();
    }
    Ok(sum)
}
