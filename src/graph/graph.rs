use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Bound;

/// Undirected edge stored with `u < v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub u: u32,
    pub v: u32,
}

impl Edge {
    /// Orders the endpoints so that `(a, b)` and `(b, a)` name the same edge.
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Edge { u: a, v: b }
        } else {
            Edge { u: b, v: a }
        }
    }

    pub fn endpoints(&self) -> (u32, u32) {
        (self.u, self.v)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.u, self.v)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    adjacency: BTreeMap<u32, BTreeSet<u32>>,
    edge_count: usize,
}

impl Graph {
    /// Graph over the vertices `1..=n` with no edges.
    pub fn new(n: u32) -> Self {
        Graph::with_vertices(1..=n)
    }

    pub fn with_vertices(vertices: impl IntoIterator<Item = u32>) -> Self {
        let adjacency = vertices
            .into_iter()
            .map(|vertex| (vertex, BTreeSet::new()))
            .collect();
        Graph {
            adjacency,
            edge_count: 0,
        }
    }

    /// Inserts the undirected edge `{u, v}`.
    ///
    /// Returns `Ok(false)` when the edge was already present; the adjacency
    /// and edge count are left untouched in that case.
    pub fn add_edge(&mut self, u: u32, v: u32) -> Result<bool> {
        if u == v {
            return Err(ProtocolError::SelfLoop(u));
        }
        for vertex in [u, v] {
            if !self.adjacency.contains_key(&vertex) {
                return Err(ProtocolError::UnknownVertex(vertex));
            }
        }

        let inserted = self
            .adjacency
            .get_mut(&u)
            .map(|neighbors| neighbors.insert(v))
            .unwrap_or(false);
        if let Some(neighbors) = self.adjacency.get_mut(&v) {
            neighbors.insert(u);
        }
        if inserted {
            self.edge_count += 1;
        }
        Ok(inserted)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains_vertex(&self, vertex: u32) -> bool {
        self.adjacency.contains_key(&vertex)
    }

    pub fn contains_edge(&self, u: u32, v: u32) -> bool {
        self.adjacency
            .get(&u)
            .map(|neighbors| neighbors.contains(&v))
            .unwrap_or(false)
    }

    pub fn neighbors(&self, vertex: u32) -> Option<&BTreeSet<u32>> {
        self.adjacency.get(&vertex)
    }

    /// Vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = u32> + '_ {
        self.adjacency.keys().copied()
    }

    /// Every undirected edge exactly once, ascending by `(u, v)`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency.iter().flat_map(|(&u, neighbors)| {
            neighbors
                .range((Bound::Excluded(u), Bound::Unbounded))
                .map(move |&v| Edge { u, v })
        })
    }
}
