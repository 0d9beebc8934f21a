use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dag_layout::{DagLayout, DagLayoutConfig, Point, SeededRng};
use petgraph::stable_graph::NodeIndex;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

mod edges;

use edges::parse_edges;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Ron,
}

/// Lay out a directed graph in layers and print the eased node positions
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Edge list, one `from -> to` per line
    #[arg(required_unless_present = "list_properties")]
    edges: Option<PathBuf>,

    /// Number of animation steps to run
    #[arg(long, default_value_t = 1000)]
    steps: usize,

    /// Seed of the slot optimizer, random if not given
    #[arg(long)]
    seed: Option<u64>,

    /// Layout configuration in RON format
    #[arg(long)]
    config: Option<PathBuf>,

    /// Share of the way to its target a node moves per step
    #[arg(long)]
    speed: Option<f32>,

    /// Horizontal distance between slots
    #[arg(long)]
    x_distance: Option<f32>,

    /// Vertical distance between layers
    #[arg(long)]
    y_distance: Option<f32>,

    /// Random slot swaps tried per step
    #[arg(long)]
    randomizations: Option<usize>,

    /// Override a property by key, e.g. `--set speed=0.5`
    #[arg(long = "set", value_name = "KEY=VALUE")]
    properties: Vec<String>,

    /// List the available properties and exit
    #[arg(long)]
    list_properties: bool,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Debug, Serialize)]
struct NodeOutput {
    name: String,
    layer: usize,
    slot: usize,
    position: Point,
    target: Point,
}

fn load_config(args: &Args) -> Result<DagLayoutConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ron::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => DagLayoutConfig::default(),
    };

    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if let Some(x_distance) = args.x_distance {
        config.x_distance = x_distance;
    }
    if let Some(y_distance) = args.y_distance {
        config.y_distance = y_distance;
    }
    if let Some(randomizations) = args.randomizations {
        config.randomizations_per_pass = randomizations;
    }

    for property in &args.properties {
        let (key, value) = property
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got {property:?}"))?;
        config
            .set_property(key.trim(), value)
            .with_context(|| format!("Can't set {property:?}"))?;
    }

    config.validate()?;
    Ok(config)
}

fn list_properties(config: &DagLayoutConfig) -> Result<()> {
    for property in DagLayoutConfig::properties() {
        println!(
            "{:<24} {:<22} {:>10}  {}",
            property.key,
            property.name,
            config.get_property(property.key)?,
            property.description
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let config = load_config(&args)?;
    if args.list_properties {
        return list_properties(&config);
    }

    let path = args.edges.as_ref().context("An edge list is required")?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let graph = RwLock::new(parse_edges(&text)?);

    let rng = args.seed.map(SeededRng::new).unwrap_or_default();
    let mut layout = DagLayout::new().with_config(config).with_rng(rng);
    debug!("Layout: {layout:?}");

    layout.start(&graph)?;
    let mut positions: HashMap<NodeIndex, Point> = HashMap::new();
    for _ in 0..args.steps {
        layout.step(&graph, &mut positions)?;
    }
    layout.stop();
    info!("Ran {} steps", args.steps);

    let graph = graph
        .read()
        .map_err(|_| anyhow::anyhow!("Graph lock is poisoned"))?;
    let mut nodes = graph
        .node_indices()
        .map(|node| -> Result<NodeOutput> {
            let state = layout
                .layout_state(node)
                .with_context(|| format!("No layout for {}", graph[node]))?;
            Ok(NodeOutput {
                name: graph[node].clone(),
                layer: state.layer,
                slot: state.slot,
                position: positions.get(&node).copied().unwrap_or_default(),
                target: layout.target(node).unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    nodes.sort_by_key(|node| (node.layer, node.slot));

    match args.format {
        Format::Table => {
            println!(
                "{:<16} {:>5} {:>5} {:>10} {:>10}",
                "node", "layer", "slot", "x", "y"
            );
            for node in &nodes {
                println!(
                    "{:<16} {:>5} {:>5} {:>10.2} {:>10.2}",
                    node.name, node.layer, node.slot, node.position.x, node.position.y
                );
            }
        }
        Format::Ron => {
            let pretty = ron::ser::PrettyConfig::default();
            println!("{}", ron::ser::to_string_pretty(&nodes, pretty)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn typed_flags_override_defaults() {
        let args = Args::try_parse_from([
            "dag-layout",
            "graph.txt",
            "--speed",
            "0.5",
            "--x-distance",
            "40",
            "--y-distance",
            "60",
            "--randomizations",
            "3",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();

        assert_eq!(config.speed, 0.5);
        assert_eq!(config.x_distance, 40.0);
        assert_eq!(config.y_distance, 60.0);
        assert_eq!(config.randomizations_per_pass, 3);
    }

    #[test]
    fn set_overrides_typed_flags() {
        let args = Args::try_parse_from([
            "dag-layout",
            "graph.txt",
            "--speed",
            "0.5",
            "--set",
            "speed=0.25",
        ])
        .unwrap();
        assert_eq!(load_config(&args).unwrap().speed, 0.25);
    }

    #[test]
    fn out_of_range_flag_is_rejected() {
        let args = Args::try_parse_from(["dag-layout", "graph.txt", "--speed", "2"]).unwrap();
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn edges_are_required_unless_listing_properties() {
        assert!(Args::try_parse_from(["dag-layout"]).is_err());
        assert!(Args::try_parse_from(["dag-layout", "--list-properties"]).is_ok());
    }
}
