use super::{LayoutError, LayoutState};
use crate::GraphView;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Layers × slots matrix of cells holding at most one node each
///
/// Every layer is `max_slot` cells wide; layers with fewer nodes keep empty
/// cells. The grid and the `slot` of each [`LayoutState`] always agree:
/// `get(state.layer, state.slot) == Some(node)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid<N> {
    cells: Vec<Vec<Option<N>>>,
    max_slot: usize,
}

impl<N> SlotGrid<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    /// Build the grid from the layer and slot of every node
    pub(crate) fn build(
        layers: usize,
        max_slot: usize,
        states: &HashMap<N, LayoutState>,
    ) -> Self {
        let mut cells = vec![vec![None; max_slot]; layers];
        for (&node, state) in states {
            cells[state.layer][state.slot] = Some(node);
        }
        Self { cells, max_slot }
    }

    pub fn layers(&self) -> usize {
        self.cells.len()
    }

    /// Width of every layer
    pub fn max_slot(&self) -> usize {
        self.max_slot
    }

    /// Occupant of a cell, `None` for empty or out of range cells
    pub fn get(&self, layer: usize, slot: usize) -> Option<N> {
        self.cells.get(layer)?.get(slot).copied().flatten()
    }

    /// Cells of a layer, by slot
    pub fn layer(&self, layer: usize) -> &[Option<N>] {
        self.cells.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Occupied cells as `(layer, slot, node)`
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, N)> + '_ {
        self.cells.iter().enumerate().flat_map(|(layer, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(slot, node)| node.map(|node| (layer, slot, node)))
        })
    }

    /// Fail on the first cell whose occupant was removed from the graph
    pub(crate) fn check_occupants<G>(&self, graph: &G) -> Result<(), LayoutError<N>>
    where
        G: GraphView<NodeId = N>,
    {
        match self
            .occupied()
            .find(|&(_, _, node)| !graph.contains_node(node))
        {
            Some((layer, slot, node)) => Err(LayoutError::StaleGrid { layer, slot, node }),
            None => Ok(()),
        }
    }

    /// Exchange two cells of a layer and the slots of their occupants
    ///
    /// Either cell may be empty, in which case the other occupant simply
    /// moves. Nothing is changed if an occupant has no state.
    pub(crate) fn swap(
        &mut self,
        layer: usize,
        first: usize,
        second: usize,
        states: &mut HashMap<N, LayoutState>,
    ) -> Result<(), LayoutError<N>> {
        let first_node = self.get(layer, first);
        let second_node = self.get(layer, second);

        for node in [first_node, second_node].into_iter().flatten() {
            if !states.contains_key(&node) {
                return Err(LayoutError::MissingLayoutState(node));
            }
        }

        let cells = &mut self.cells[layer];
        cells.swap(first, second);

        if let Some(state) = first_node.and_then(|node| states.get_mut(&node)) {
            state.slot = second;
        }
        if let Some(state) = second_node.and_then(|node| states.get_mut(&node)) {
            state.slot = first;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graphmap::DiGraphMap;

    fn state(layer: usize, slot: usize) -> LayoutState {
        LayoutState {
            layer,
            slot,
            unresolved_in_degree: 0,
        }
    }

    fn fixture() -> (SlotGrid<char>, HashMap<char, LayoutState>) {
        let states = HashMap::from([
            ('a', state(0, 0)),
            ('b', state(1, 0)),
            ('c', state(1, 1)),
            ('d', state(2, 0)),
        ]);
        (SlotGrid::build(3, 2, &states), states)
    }

    fn assert_consistent(grid: &SlotGrid<char>, states: &HashMap<char, LayoutState>) {
        for (node, state) in states {
            assert_eq!(grid.get(state.layer, state.slot), Some(*node));
        }
        assert_eq!(grid.occupied().count(), states.len());
    }

    #[test]
    fn build_places_nodes() {
        let (grid, states) = fixture();
        assert_eq!(grid.layers(), 3);
        assert_eq!(grid.max_slot(), 2);
        assert_eq!(grid.layer(0), &[Some('a'), None]);
        assert_eq!(grid.layer(1), &[Some('b'), Some('c')]);
        assert_eq!(grid.get(2, 1), None);
        assert_eq!(grid.get(7, 0), None);
        assert_consistent(&grid, &states);
    }

    #[test]
    fn swap_two_occupants() {
        let (mut grid, mut states) = fixture();
        grid.swap(1, 0, 1, &mut states).unwrap();

        assert_eq!(grid.layer(1), &[Some('c'), Some('b')]);
        assert_eq!(states[&'b'].slot, 1);
        assert_eq!(states[&'c'].slot, 0);
        assert_consistent(&grid, &states);
    }

    #[test]
    fn swap_into_empty_cell_moves_node() {
        let (mut grid, mut states) = fixture();
        grid.swap(0, 0, 1, &mut states).unwrap();

        assert_eq!(grid.layer(0), &[None, Some('a')]);
        assert_eq!(states[&'a'].slot, 1);
        assert_consistent(&grid, &states);
    }

    #[test]
    fn swap_with_itself_is_a_no_op() {
        let (mut grid, mut states) = fixture();
        let before = grid.clone();
        grid.swap(1, 1, 1, &mut states).unwrap();

        assert_eq!(grid, before);
        assert_consistent(&grid, &states);
    }

    #[test]
    fn swap_without_state_fails_untouched() {
        let (mut grid, mut states) = fixture();
        states.remove(&'c');
        let before = grid.clone();

        assert!(matches!(
            grid.swap(1, 0, 1, &mut states),
            Err(LayoutError::MissingLayoutState('c'))
        ));
        assert_eq!(grid, before);
        assert_eq!(states[&'b'].slot, 0);
    }

    #[test]
    fn removed_occupant_is_stale() {
        let (grid, _) = fixture();
        let mut graph = DiGraphMap::<char, ()>::from_edges([('a', 'b'), ('a', 'c'), ('b', 'd')]);
        assert!(grid.check_occupants(&graph).is_ok());

        graph.remove_node('c');
        assert!(matches!(
            grid.check_occupants(&graph),
            Err(LayoutError::StaleGrid {
                layer: 1,
                slot: 1,
                node: 'c'
            })
        ));
    }
}
