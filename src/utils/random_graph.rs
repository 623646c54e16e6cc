use crate::error::Result;
use crate::graph::{Coloring, Graph};
use crate::utils::serialization::{parse_instance, GraphInstance};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const EDGE_PROBABILITY: f64 = 0.5;

/// Four vertices, five edges, properly colored with three colors.
pub const EXAMPLE_INSTANCE: &str = "4 5\n1 2\n1 3\n1 4\n2 3\n3 4\n1 2 3 2\n";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceParameters {
    pub nodes: u32,
    pub colors: u32,
    pub edge_probability: f64,
    pub edges: usize,
}

pub fn example_instance() -> Result<GraphInstance> {
    parse_instance(EXAMPLE_INSTANCE)
}

/// Random graph with a planted proper coloring.
///
/// Every vertex draws a color from `1..=colors`, then each pair of
/// differently colored vertices is joined with probability
/// `edge_probability`. Same-colored pairs are never joined, so the planted
/// coloring is always proper.
pub fn generate_colorable_instance(
    nodes: u32,
    colors: u32,
    edge_probability: f64,
    rng: &mut impl Rng,
) -> Result<(GraphInstance, InstanceParameters)> {
    let colors = colors.clamp(1, nodes.max(1));
    let assignment: Vec<u32> = (0..nodes).map(|_| rng.random_range(1..=colors)).collect();
    let mut graph = Graph::new(nodes);

    for u in 1..=nodes {
        for v in (u + 1)..=nodes {
            let differ = assignment[(u - 1) as usize] != assignment[(v - 1) as usize];
            if differ && rng.random_bool(edge_probability.clamp(0.0, 1.0)) {
                graph.add_edge(u, v)?;
            }
        }
    }

    let coloring = Coloring::from_sequence(&assignment)?;
    let params = InstanceParameters {
        nodes,
        colors: coloring.num_colors(),
        edge_probability,
        edges: graph.edge_count(),
    };
    Ok((GraphInstance::new(graph, Some(coloring)), params))
}
