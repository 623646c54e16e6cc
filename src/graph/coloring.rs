use crate::error::{ProtocolError, Result};
use crate::graph::{Edge, Graph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Colors are 1-based; a coloring with `k` colors uses values in `1..=k`.
pub type Color = u32;

/// Total assignment of colors to the vertices of a graph.
///
/// Properness is a precondition of the protocol, not an invariant of this
/// type: an improper coloring can be loaded and proven, and the verifier is
/// expected to catch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coloring {
    colors: BTreeMap<u32, Color>,
    num_colors: u32,
}

impl Coloring {
    pub fn new(colors: BTreeMap<u32, Color>) -> Result<Self> {
        if let Some((&vertex, _)) = colors.iter().find(|(_, &color)| color == 0) {
            return Err(ProtocolError::malformed(
                0,
                format!("vertex {vertex} has color 0; colors start at 1"),
            ));
        }
        let num_colors = colors.values().copied().max().unwrap_or(0);
        Ok(Coloring { colors, num_colors })
    }

    /// Colors listed in vertex order `1..=colors.len()`.
    pub fn from_sequence(colors: &[Color]) -> Result<Self> {
        let map = colors
            .iter()
            .enumerate()
            .map(|(idx, &color)| (idx as u32 + 1, color))
            .collect();
        Coloring::new(map)
    }

    pub fn color_of(&self, vertex: u32) -> Option<Color> {
        self.colors.get(&vertex).copied()
    }

    /// Largest color in use, i.e. `k`.
    pub fn num_colors(&self) -> u32 {
        self.num_colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Color)> + '_ {
        self.colors.iter().map(|(&vertex, &color)| (vertex, color))
    }

    /// Fails with `UnknownVertex` for the first graph vertex left uncolored.
    pub fn ensure_covers(&self, graph: &Graph) -> Result<()> {
        match graph.vertices().find(|vertex| !self.colors.contains_key(vertex)) {
            Some(vertex) => Err(ProtocolError::UnknownVertex(vertex)),
            None => Ok(()),
        }
    }

    pub fn conflicting_edges(&self, graph: &Graph) -> Vec<Edge> {
        graph
            .edges()
            .filter(|edge| {
                let (u, v) = edge.endpoints();
                self.color_of(u) == self.color_of(v)
            })
            .collect()
    }

    pub fn is_proper(&self, graph: &Graph) -> bool {
        self.conflicting_edges(graph).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> Graph {
        let mut graph = Graph::new(4);
        for (u, v) in [(1, 2), (1, 3), (1, 4), (2, 3), (3, 4)] {
            graph.add_edge(u, v).unwrap();
        }
        graph
    }

    #[test]
    fn proper_coloring_has_no_conflicts() {
        let coloring = Coloring::from_sequence(&[1, 2, 3, 2]).unwrap();
        assert_eq!(coloring.num_colors(), 3);
        assert!(coloring.is_proper(&sample_graph()));
    }

    #[test]
    fn improper_coloring_reports_conflicting_edge() {
        let coloring = Coloring::from_sequence(&[1, 1, 3, 2]).unwrap();
        assert_eq!(coloring.conflicting_edges(&sample_graph()), vec![Edge::new(1, 2)]);
    }

    #[test]
    fn zero_color_is_rejected() {
        assert!(matches!(
            Coloring::from_sequence(&[1, 0, 2]),
            Err(ProtocolError::MalformedInput { .. })
        ));
    }

    #[test]
    fn coverage_check_names_missing_vertex() {
        let coloring = Coloring::from_sequence(&[1, 2, 3]).unwrap();
        assert!(matches!(
            coloring.ensure_covers(&sample_graph()),
            Err(ProtocolError::UnknownVertex(4))
        ));
    }
}
