use anyhow::{bail, Result};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::HashMap;
use tracing::debug;

/// Parse an edge list into a graph whose node weights are the node names
///
/// One entry per line: `from -> to`, `from to`, or a lone `name` declaring a
/// node without edges. Everything after a `#` is a comment.
pub fn parse_edges(input: &str) -> Result<StableDiGraph<String, ()>> {
    let mut graph = StableDiGraph::new();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

    let mut node = |graph: &mut StableDiGraph<String, ()>, name: &str| {
        *nodes
            .entry(name.to_string())
            .or_insert_with(|| graph.add_node(name.to_string()))
    };

    for (number, line) in input.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let names: Vec<&str> = if line.contains("->") {
            line.split("->").map(str::trim).collect()
        } else {
            line.split_whitespace().collect()
        };

        match names.as_slice() {
            [name] if !name.is_empty() => {
                node(&mut graph, name);
            }
            [from, to] if !from.is_empty() && !to.is_empty() => {
                let from = node(&mut graph, from);
                let to = node(&mut graph, to);
                graph.add_edge(from, to, ());
            }
            _ => bail!("line {}: expected `from -> to`, got {line:?}", number + 1),
        }
    }

    debug!(
        "Parsed {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn names(graph: &StableDiGraph<String, ()>) -> Vec<(String, String)> {
        let mut edges: Vec<_> = graph
            .edge_indices()
            .filter_map(|edge| graph.edge_endpoints(edge))
            .map(|(from, to)| (graph[from].clone(), graph[to].clone()))
            .collect();
        edges.sort();
        edges
    }

    #[test]
    fn arrows_and_whitespace() {
        let graph = parse_edges("a -> b\nb c\n  # comment\n\nc->a # back edge\n").unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(
            names(&graph),
            vec![
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "c".to_string()),
                ("c".to_string(), "a".to_string()),
            ]
        );
    }

    #[test]
    fn lone_names_declare_nodes() {
        let graph = parse_edges("x\na -> b\nx").unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn parallel_edges_are_kept() {
        let graph = parse_edges("a -> b\na -> b").unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let error = parse_edges("a -> b\na b c\n").unwrap_err();
        assert!(error.to_string().contains("line 2"), "{error}");

        assert!(parse_edges("a -> ").is_err());
    }
}
