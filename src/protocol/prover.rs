use crate::crypto::{Commitment, CommitmentScheme, Nonce};
use crate::error::{ProtocolError, Result};
use crate::graph::{Color, Coloring, Graph};
use crate::protocol::messages::{ChallengeMessage, CommitMessage, ResponseMessage};
use crate::utils::permutation::ColorPermutation;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
struct Opening {
    color: Color,
    nonce: Nonce,
}

/// Everything committed to in one round. Built once by `prove` and never
/// mutated; the next `prove` replaces it wholesale.
#[derive(Debug)]
struct RoundState {
    permutation: ColorPermutation,
    openings: BTreeMap<u32, Opening>,
    commitments: Vec<Commitment>,
    vertex_order: Vec<u32>,
}

impl RoundState {
    fn build(
        graph: &Graph,
        coloring: &Coloring,
        scheme: &CommitmentScheme,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let permutation = ColorPermutation::generate(coloring.num_colors(), rng);
        let vertex_order: Vec<u32> = graph.vertices().collect();
        let mut openings = BTreeMap::new();
        let mut commitments = Vec::with_capacity(vertex_order.len());

        for &vertex in &vertex_order {
            let color = coloring
                .color_of(vertex)
                .and_then(|color| permutation.apply(color))
                .ok_or(ProtocolError::UnknownVertex(vertex))?;
            let nonce = Nonce::random(rng);
            commitments.push(scheme.commit(vertex, color, &nonce));
            openings.insert(vertex, Opening { color, nonce });
        }

        Ok(RoundState {
            permutation,
            openings,
            commitments,
            vertex_order,
        })
    }

    fn opening(&self, vertex: u32) -> Result<Opening> {
        self.openings
            .get(&vertex)
            .copied()
            .ok_or(ProtocolError::UnknownVertex(vertex))
    }
}

pub struct Prover {
    graph: Graph,
    coloring: Coloring,
    scheme: CommitmentScheme,
    rng: StdRng,
    round: Option<RoundState>,
}

impl Prover {
    /// Prover drawing permutations and nonces from an OS-seeded CSPRNG.
    pub fn new(graph: Graph, coloring: Coloring, scheme: CommitmentScheme) -> Result<Self> {
        Self::with_rng(graph, coloring, scheme, StdRng::from_os_rng())
    }

    /// Reproducible prover; the seed fully determines every nonce.
    pub fn with_seed(
        graph: Graph,
        coloring: Coloring,
        scheme: CommitmentScheme,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(graph, coloring, scheme, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        graph: Graph,
        coloring: Coloring,
        scheme: CommitmentScheme,
        rng: StdRng,
    ) -> Result<Self> {
        coloring.ensure_covers(&graph)?;
        if coloring.num_colors() as usize > graph.vertex_count() {
            return Err(ProtocolError::PaletteTooLarge {
                colors: coloring.num_colors(),
                vertices: graph.vertex_count(),
            });
        }
        let conflicts = coloring.conflicting_edges(&graph);
        if !conflicts.is_empty() {
            warn!(
                conflicts = conflicts.len(),
                first = %conflicts[0],
                "prover coloring is not proper; verification is expected to fail"
            );
        }
        Ok(Prover {
            graph,
            coloring,
            scheme,
            rng,
            round: None,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn num_colors(&self) -> u32 {
        self.coloring.num_colors()
    }

    /// Starts a round: fresh permutation, fresh nonces, fresh commitments.
    pub fn prove(&mut self) -> Result<CommitMessage> {
        let round = RoundState::build(&self.graph, &self.coloring, &self.scheme, &mut self.rng)?;
        debug!(
            vertices = round.vertex_order.len(),
            colors = round.permutation.len(),
            "committed to permuted coloring"
        );
        let message = CommitMessage {
            commitments: round.commitments.clone(),
            vertex_order: round.vertex_order.clone(),
        };
        self.round = Some(round);
        Ok(message)
    }

    /// Opens the commitments of the challenged edge's endpoints. A round
    /// answers exactly one valid challenge; the next needs a fresh `prove`.
    pub fn respond(&mut self, challenge: &ChallengeMessage) -> Result<ResponseMessage> {
        let (u, v) = (challenge.u, challenge.v);
        for vertex in [u, v] {
            if !self.graph.contains_vertex(vertex) {
                return Err(ProtocolError::UnknownVertex(vertex));
            }
        }
        if !self.graph.contains_edge(u, v) {
            return Err(ProtocolError::NotAnEdge(u, v));
        }
        let round = self.round.take().ok_or(ProtocolError::NoActiveRound)?;

        let opening_u = round.opening(u)?;
        let opening_v = round.opening(v)?;
        Ok(ResponseMessage {
            u,
            v,
            color_u: opening_u.color,
            color_v: opening_v.color,
            nonce_u: opening_u.nonce,
            nonce_v: opening_v.nonce,
            colors_differ: opening_u.color != opening_v.color,
        })
    }
}
