use super::{LayoutError, LayoutState};
use crate::{DagLayoutConfig, GraphView, Point, PositionStore};
use std::collections::HashMap;

/// Grid position of a node, scaled to rendered distances
///
/// Layers grow downwards, hence the negative y.
pub fn target_position(state: &LayoutState, config: &DagLayoutConfig) -> Point {
    Point::new(
        state.slot as f32 * config.x_distance,
        -(state.layer as f32) * config.y_distance,
    )
}

/// Move every node a `speed` share of the way towards its target
pub(crate) fn ease_positions<G, P>(
    graph: &G,
    states: &HashMap<G::NodeId, LayoutState>,
    config: &DagLayoutConfig,
    positions: &mut P,
) -> Result<(), LayoutError<G::NodeId>>
where
    G: GraphView,
    P: PositionStore<G::NodeId> + ?Sized,
{
    for node in graph.node_ids() {
        let state = states
            .get(&node)
            .ok_or(LayoutError::MissingLayoutState(node))?;
        let target = target_position(state, config);
        let current = positions.position(node).unwrap_or_default();
        positions.set_position(node, current.lerp(target, config.speed));
    }
    Ok(())
}
