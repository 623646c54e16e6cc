//! Line-oriented text format for graph instances:
//!
//! ```text
//! n m
//! u1 v1
//! ...
//! um vm
//! c1 c2 ... cn
//! ```
//!
//! The trailing coloring line is optional; only the prover needs it.
//! Colors range over `1..=n`, and `n` is capped at [`MAX_VERTICES`].

use crate::error::{ProtocolError, Result};
use crate::graph::{Color, Coloring, Graph};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Largest vertex count a text instance may declare.
pub const MAX_VERTICES: u32 = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphInstance {
    pub graph: Graph,
    pub coloring: Option<Coloring>,
}

impl GraphInstance {
    pub fn new(graph: Graph, coloring: Option<Coloring>) -> Self {
        GraphInstance { graph, coloring }
    }

    /// The prover's private coloring; absent on a verifier-side copy.
    pub fn require_coloring(&self) -> Result<&Coloring> {
        self.coloring
            .as_ref()
            .ok_or_else(|| ProtocolError::malformed(0, "instance has no coloring line"))
    }
}

impl FromStr for GraphInstance {
    type Err = ProtocolError;

    fn from_str(text: &str) -> Result<Self> {
        parse_instance(text)
    }
}

pub fn load_graph_instance<P: AsRef<Path>>(path: P) -> Result<GraphInstance> {
    let text = fs::read_to_string(path)?;
    parse_instance(&text)
}

pub fn save_graph_instance<P: AsRef<Path>>(path: P, instance: &GraphInstance) -> Result<()> {
    fs::write(path, render_instance(instance)?)?;
    Ok(())
}

pub fn parse_instance(text: &str) -> Result<GraphInstance> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| ProtocolError::malformed(1, "missing `n m` header"))?;
    let header = parse_tokens::<u64>(header_line, header)?;
    let (n, m) = match header.as_slice() {
        [n, m] => (*n, *m),
        _ => {
            return Err(ProtocolError::malformed(
                header_line,
                format!("header needs 2 integers, found {}", header.len()),
            ))
        }
    };
    let n = u32::try_from(n)
        .ok()
        .filter(|&n| n <= MAX_VERTICES)
        .ok_or_else(|| {
            ProtocolError::malformed(
                header_line,
                format!("vertex count {n} exceeds the limit of {MAX_VERTICES}"),
            )
        })?;

    let mut graph = Graph::new(n);
    for parsed in 0..m {
        let (line_no, line) = lines.next().ok_or_else(|| {
            ProtocolError::malformed(
                header_line,
                format!("declared {m} edges but found only {parsed}"),
            )
        })?;
        let (u, v) = parse_edge(line_no, line, n)?;
        graph.add_edge(u, v).map_err(|err| ProtocolError::malformed(line_no, err.to_string()))?;
    }

    let coloring = match lines.next() {
        None => None,
        Some((line_no, line)) => {
            let colors = parse_tokens::<Color>(line_no, line)?;
            if colors.len() == 2 && n != 2 {
                return Err(ProtocolError::malformed(
                    line_no,
                    format!("more edge lines than the declared {m}"),
                ));
            }
            if colors.len() != n as usize {
                return Err(ProtocolError::malformed(
                    line_no,
                    format!("coloring lists {} colors for {n} vertices", colors.len()),
                ));
            }
            if let Some(color) = colors.iter().find(|&&color| color > n) {
                return Err(ProtocolError::malformed(
                    line_no,
                    format!("color {color} is outside [1, {n}]"),
                ));
            }
            let coloring = Coloring::from_sequence(&colors)
                .map_err(|err| ProtocolError::malformed(line_no, err.to_string()))?;
            Some(coloring)
        }
    };

    if let Some((line_no, _)) = lines.next() {
        return Err(ProtocolError::malformed(
            line_no,
            "unexpected content after the coloring line",
        ));
    }

    Ok(GraphInstance { graph, coloring })
}

/// Writes an instance back in the text format. Vertices must be `1..=n`.
pub fn render_instance(instance: &GraphInstance) -> Result<String> {
    let graph = &instance.graph;
    let n = graph.vertex_count();
    if let Some((idx, vertex)) = graph
        .vertices()
        .enumerate()
        .find(|&(idx, vertex)| vertex as usize != idx + 1)
    {
        return Err(ProtocolError::malformed(
            0,
            format!("vertex {vertex} at position {} breaks the 1..=n numbering", idx + 1),
        ));
    }

    let mut out = format!("{} {}\n", n, graph.edge_count());
    for edge in graph.edges() {
        out.push_str(&format!("{} {}\n", edge.u, edge.v));
    }
    if let Some(coloring) = &instance.coloring {
        let mut colors = Vec::with_capacity(n);
        for vertex in graph.vertices() {
            let color = coloring
                .color_of(vertex)
                .ok_or(ProtocolError::UnknownVertex(vertex))?;
            colors.push(color.to_string());
        }
        out.push_str(&colors.join(" "));
        out.push('\n');
    }
    Ok(out)
}

fn parse_tokens<T: FromStr>(line_no: usize, line: &str) -> Result<Vec<T>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|_| {
                ProtocolError::malformed(line_no, format!("`{token}` is not a valid integer"))
            })
        })
        .collect()
}

fn parse_edge(line_no: usize, line: &str, n: u32) -> Result<(u32, u32)> {
    let tokens = parse_tokens::<u32>(line_no, line)?;
    let (u, v) = match tokens.as_slice() {
        [u, v] => (*u, *v),
        _ => {
            return Err(ProtocolError::malformed(
                line_no,
                format!("edge line needs 2 vertices, found {}", tokens.len()),
            ))
        }
    };
    for vertex in [u, v] {
        if vertex == 0 || vertex > n {
            return Err(ProtocolError::malformed(
                line_no,
                format!("vertex {vertex} is outside [1, {n}]"),
            ));
        }
    }
    Ok((u, v))
}
