//! Animated layered layout for directed graphs
//!
//! Nodes are assigned to discrete layers so that edges point from lower to
//! higher layers, and to slots within their layer. Cycles are tolerated by
//! disregarding one predecessor of a node on the cycle. While the layout runs,
//! random slot swaps that shorten the edges are kept, and node positions are
//! eased towards their grid coordinates a little on every step.
//!
//! The graph is read through the [`GraphView`] trait, implemented for
//! petgraph's directed `Graph`, `StableGraph` and `GraphMap`. Rendered
//! positions live in a separate [`PositionStore`].
//!
//! # Example
//!
//! ```
//! use dag_layout::{DagLayout, DagLayoutConfig, Point, SeededRng};
//! use petgraph::graph::{DiGraph, NodeIndex};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! let mut graph = DiGraph::<&str, ()>::new();
//! let a = graph.add_node("a");
//! let b = graph.add_node("b");
//! let c = graph.add_node("c");
//! graph.extend_with_edges([(a, b), (a, c)]);
//! let graph = RwLock::new(graph);
//!
//! let mut layout = DagLayout::new()
//!     .with_config(DagLayoutConfig {
//!         speed: 0.1,
//!         ..Default::default()
//!     })
//!     .with_rng(SeededRng::new(1));
//!
//! // Layer the graph once...
//! layout.start(&graph)?;
//! assert_eq!(layout.layout_state(b).unwrap().layer, 1);
//!
//! // ...then step once per frame
//! let mut positions: HashMap<NodeIndex, Point> = HashMap::new();
//! for _ in 0..100 {
//!     layout.step(&graph, &mut positions)?;
//! }
//! assert_eq!(layout.target(a).unwrap().y, 0.0);
//! # Ok::<(), dag_layout::LayoutError<NodeIndex>>(())
//! ```

mod config;
mod geometry;
mod graph;
mod order;
mod positions;
mod random;

pub mod layered;

// Re-export core types and traits
pub use config::{ConfigError, DagLayoutConfig, Property};
pub use geometry::Point;
pub use graph::GraphView;
pub use order::{ByIdentifier, GraphOrder, TraversalOrder};
pub use positions::PositionStore;
pub use random::{RandomSource, SeededRng};

// Re-export layered layout types
pub use layered::{DagLayout, LayoutError, LayoutState, SlotGrid};
