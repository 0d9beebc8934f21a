mod easing;
mod grid;
mod layers;
mod optimize;

use crate::{
    ByIdentifier, ConfigError, DagLayoutConfig, GraphView, Point, PositionStore, RandomSource,
    SeededRng, TraversalOrder,
};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, info_span, trace};

pub use easing::target_position;
pub use grid::SlotGrid;
pub use layers::{assign_layers, break_cycles, compute_layering, CycleBreak, Layering};
pub use optimize::PassStats;

use easing::ease_positions;
use optimize::{improve_slots, shuffle_slots};

/// Errors that abort a layout pass
///
/// All of them are fatal: the layout state is dropped and the layout has to
/// be initialized again.
#[derive(Debug, Error)]
pub enum LayoutError<N>
where
    N: fmt::Debug,
{
    /// A node of the graph has no layout state, the graph changed since the
    /// last initialization
    #[error("node {0:?} has no layout state")]
    MissingLayoutState(N),

    /// The grid still holds a node which was removed from the graph
    #[error("grid cell ({layer}, {slot}) holds node {node:?} which is not in the graph anymore")]
    StaleGrid { layer: usize, slot: usize, node: N },

    /// The read lock of the graph could not be acquired
    #[error("graph lock is poisoned")]
    LockPoisoned,

    #[error("layout is not initialized")]
    NotInitialized,

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Per node bookkeeping of the layout, never stored in the graph itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutState {
    pub layer: usize,
    pub slot: usize,

    /// Predecessors not visited yet by the running sweep
    pub unresolved_in_degree: usize,
}

impl LayoutState {
    pub(crate) fn new(in_degree: usize) -> Self {
        Self {
            unresolved_in_degree: in_degree,
            ..Default::default()
        }
    }

    /// Count one visited predecessor, returns true when it was the last one
    pub(crate) fn resolve_predecessor(&mut self) -> bool {
        if self.unresolved_in_degree == 0 {
            return false;
        }
        self.unresolved_in_degree -= 1;
        self.unresolved_in_degree == 0
    }

    /// Disregard one pending predecessor to break a cycle
    pub(crate) fn ignore_loop_edge(&mut self) {
        self.unresolved_in_degree = self.unresolved_in_degree.saturating_sub(1);
    }
}

/// Layout state and grid, rebuilt by every initialization
#[derive(Debug)]
struct Arrangement<N> {
    states: HashMap<N, LayoutState>,
    grid: SlotGrid<N>,
}

/// Animated layered layout for directed graphs
///
/// Nodes are put in discrete layers so edges point downwards, as far up as
/// their predecessors allow, and in slots within their layer. While running,
/// random pairs of slots are swapped when that makes the edges shorter, and
/// node positions creep towards their slot.
pub struct DagLayout<N, R = SeededRng> {
    config: DagLayoutConfig,
    rng: R,
    order: Box<dyn TraversalOrder<N>>,
    running: bool,
    arrangement: Option<Arrangement<N>>,
}

impl<N> Default for DagLayout<N>
where
    N: Copy + Ord + Hash + fmt::Debug + 'static,
{
    fn default() -> Self {
        Self {
            config: DagLayoutConfig::default(),
            rng: SeededRng::default(),
            order: Box::new(ByIdentifier),
            running: false,
            arrangement: None,
        }
    }
}

impl<N> DagLayout<N>
where
    N: Copy + Ord + Hash + fmt::Debug + 'static,
{
    /// Create a layout with the default configuration and a random seed
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N, R> DagLayout<N, R>
where
    N: Copy + Ord + Hash + fmt::Debug + 'static,
    R: RandomSource,
{
    pub fn with_config(mut self, config: DagLayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Use another random source, e.g. a seeded one for reproducible layouts
    pub fn with_rng<R2: RandomSource>(self, rng: R2) -> DagLayout<N, R2> {
        DagLayout {
            config: self.config,
            rng,
            order: self.order,
            running: self.running,
            arrangement: self.arrangement,
        }
    }

    /// Use another traversal order for the layering sweeps
    pub fn with_order(mut self, order: impl TraversalOrder<N> + 'static) -> Self {
        self.order = Box::new(order);
        self
    }

    pub fn config(&self) -> &DagLayoutConfig {
        &self.config
    }

    /// Changes apply from the next step, which validates them
    pub fn config_mut(&mut self) -> &mut DagLayoutConfig {
        &mut self.config
    }

    /// Mark the layout as running and initialize it, unless already running
    pub fn start<G>(&mut self, graph: &RwLock<G>) -> Result<(), LayoutError<N>>
    where
        G: GraphView<NodeId = N>,
    {
        if self.running {
            return Ok(());
        }
        self.initialize(graph)?;
        self.running = true;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Layer the graph from scratch and shuffle the slots
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the graph can't be
    /// read; no layout state is kept in that case
    pub fn initialize<G>(&mut self, graph: &RwLock<G>) -> Result<(), LayoutError<N>>
    where
        G: GraphView<NodeId = N>,
    {
        self.arrangement = None;
        self.config.validate()?;

        let graph = graph.read().map_err(|_| LayoutError::LockPoisoned)?;
        let _span = info_span!("initialize", nodes = graph.node_count()).entered();

        let mut layering = compute_layering(&*graph, self.order.as_ref())?;
        let mut grid = SlotGrid::build(layering.layers.len(), layering.max_slot, &layering.states);

        let nodes = layering.layers.concat();
        shuffle_slots(&nodes, &mut grid, &mut layering.states, &mut self.rng)?;

        debug!(
            "Initialized grid of {} layers by {} slots",
            grid.layers(),
            grid.max_slot()
        );
        self.arrangement = Some(Arrangement {
            states: layering.states,
            grid,
        });
        Ok(())
    }

    /// Run one optimizer pass, then ease every node towards its slot
    ///
    /// # Errors
    /// Returns an error if the layout was not initialized, the configuration
    /// is invalid, the graph can't be read, or nodes were added or removed
    /// since the initialization. The layout state is dropped on error.
    pub fn step<G, P>(&mut self, graph: &RwLock<G>, positions: &mut P) -> Result<(), LayoutError<N>>
    where
        G: GraphView<NodeId = N>,
        P: PositionStore<N> + ?Sized,
    {
        let Some(arrangement) = self.arrangement.as_mut() else {
            return Err(LayoutError::NotInitialized);
        };

        let result = match graph.read() {
            Ok(graph) => {
                let _span = info_span!("step").entered();
                Self::run_step(&*graph, arrangement, &mut self.rng, &self.config, positions)
            }
            Err(_) => Err(LayoutError::LockPoisoned),
        };

        if result.is_err() {
            self.arrangement = None;
        }
        result
    }

    fn run_step<G, P>(
        graph: &G,
        arrangement: &mut Arrangement<N>,
        rng: &mut R,
        config: &DagLayoutConfig,
        positions: &mut P,
    ) -> Result<(), LayoutError<N>>
    where
        G: GraphView<NodeId = N>,
        P: PositionStore<N> + ?Sized,
    {
        config.validate()?;
        arrangement.grid.check_occupants(graph)?;

        let stats = improve_slots(
            graph,
            &mut arrangement.grid,
            &mut arrangement.states,
            rng,
            config.randomizations_per_pass,
        )?;
        trace!(?stats, "Optimizer pass");

        ease_positions(graph, &arrangement.states, config, positions)
    }

    /// Layer and slot of a node, if the layout is initialized
    pub fn layout_state(&self, node: N) -> Option<&LayoutState> {
        self.arrangement.as_ref()?.states.get(&node)
    }

    pub fn grid(&self) -> Option<&SlotGrid<N>> {
        self.arrangement.as_ref().map(|arrangement| &arrangement.grid)
    }

    /// Position a node is heading to
    pub fn target(&self, node: N) -> Option<Point> {
        self.layout_state(node)
            .map(|state| target_position(state, &self.config))
    }
}

impl<N, R> fmt::Debug for DagLayout<N, R>
where
    N: fmt::Debug,
    R: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DagLayout")
            .field("config", &self.config)
            .field("rng", &self.rng)
            .field("running", &self.running)
            .field("arrangement", &self.arrangement)
            .finish_non_exhaustive()
    }
}
