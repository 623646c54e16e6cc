use crate::crypto::{Commitment, CommitmentScheme, Nonce};
use crate::error::{ProtocolError, Result};
use crate::graph::{Color, Edge, Graph};
use crate::protocol::messages::{ChallengeMessage, CommitMessage, ResponseMessage};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Why a round was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// The response opens a different pair than the one challenged.
    ResponseMismatch,
    ColorsNotDistinct,
    NotAnEdge,
    MissingCommitment { vertex: u32, reason: String },
    CommitmentMismatch { vertex: u32 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::ResponseMismatch => f.write_str("response does not answer the challenge"),
            Rejection::ColorsNotDistinct => f.write_str("endpoint colors are not distinct"),
            Rejection::NotAnEdge => f.write_str("challenged pair is not an edge"),
            Rejection::MissingCommitment { vertex, reason } => {
                write!(f, "no commitment for vertex {vertex}: {reason}")
            }
            Rejection::CommitmentMismatch { vertex } => {
                write!(f, "opening does not match commitment for vertex {vertex}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundVerdict {
    Accepted,
    Rejected(Rejection),
}

impl RoundVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RoundVerdict::Accepted)
    }
}

/// Running totals over the lifetime of one verifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierStats {
    pub accepted: u64,
    pub attempted: u64,
}

impl VerifierStats {
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempted as f64
        }
    }
}

#[derive(Debug)]
struct ReceivedRound {
    commitments: Vec<Commitment>,
    positions: HashMap<u32, usize>,
}

impl ReceivedRound {
    fn new(message: CommitMessage) -> Self {
        let mut positions = HashMap::with_capacity(message.vertex_order.len());
        for (index, &vertex) in message.vertex_order.iter().enumerate() {
            positions.entry(vertex).or_insert(index);
        }
        ReceivedRound {
            commitments: message.commitments,
            positions,
        }
    }

    fn commitment_for(&self, vertex: u32) -> Result<&Commitment> {
        let index = *self
            .positions
            .get(&vertex)
            .ok_or(ProtocolError::UnknownVertex(vertex))?;
        self.commitments
            .get(index)
            .ok_or(ProtocolError::IndexOutOfRange {
                vertex,
                index,
                len: self.commitments.len(),
            })
    }
}

pub struct Verifier {
    graph: Graph,
    edges: Vec<Edge>,
    scheme: CommitmentScheme,
    rng: StdRng,
    received: Option<ReceivedRound>,
    stats: VerifierStats,
}

impl Verifier {
    pub fn new(graph: Graph, scheme: CommitmentScheme) -> Self {
        Self::with_rng(graph, scheme, StdRng::from_os_rng())
    }

    pub fn with_seed(graph: Graph, scheme: CommitmentScheme, seed: u64) -> Self {
        Self::with_rng(graph, scheme, StdRng::seed_from_u64(seed))
    }

    fn with_rng(graph: Graph, scheme: CommitmentScheme, rng: StdRng) -> Self {
        let edges = graph.edges().collect();
        Verifier {
            graph,
            edges,
            scheme,
            rng,
            received: None,
            stats: VerifierStats::default(),
        }
    }

    pub fn stats(&self) -> VerifierStats {
        self.stats
    }

    /// Stores this round's commitments, replacing whatever the previous
    /// round sent.
    pub fn receive(&mut self, message: CommitMessage) {
        if message.commitments.len() != message.vertex_order.len() {
            warn!(
                commitments = message.commitments.len(),
                vertices = message.vertex_order.len(),
                "commitment message is misaligned with its vertex order"
            );
        }
        self.received = Some(ReceivedRound::new(message));
    }

    /// Picks an edge uniformly from the deduplicated edge set.
    pub fn challenge(&mut self) -> Result<ChallengeMessage> {
        if self.received.is_none() {
            return Err(ProtocolError::NoActiveRound);
        }
        let edge = self
            .edges
            .choose(&mut self.rng)
            .ok_or(ProtocolError::EmptyGraph)?;
        Ok(ChallengeMessage::from(*edge))
    }

    /// Checks a response against the stored commitments. Every check must
    /// pass; the first failure decides the verdict.
    pub fn verify(
        &mut self,
        challenge: &ChallengeMessage,
        response: &ResponseMessage,
    ) -> Result<RoundVerdict> {
        let received = self.received.as_ref().ok_or(ProtocolError::NoActiveRound)?;
        let verdict = match self.check(received, challenge, response) {
            Ok(()) => RoundVerdict::Accepted,
            Err(rejection) => {
                warn!(edge = %challenge.edge(), reason = %rejection, "round rejected");
                RoundVerdict::Rejected(rejection)
            }
        };

        self.stats.attempted += 1;
        if verdict.is_accepted() {
            self.stats.accepted += 1;
        }
        Ok(verdict)
    }

    fn check(
        &self,
        received: &ReceivedRound,
        challenge: &ChallengeMessage,
        response: &ResponseMessage,
    ) -> core::result::Result<(), Rejection> {
        if !response.answers(challenge) {
            return Err(Rejection::ResponseMismatch);
        }

        if !response.colors_differ || response.color_u == response.color_v {
            return Err(Rejection::ColorsNotDistinct);
        }
        debug!(color_u = response.color_u, color_v = response.color_v, "colors differ");

        if !self.graph.contains_edge(challenge.u, challenge.v) {
            return Err(Rejection::NotAnEdge);
        }
        debug!(edge = %challenge.edge(), "pair is an edge");

        self.check_opening(received, response.u, response.color_u, &response.nonce_u)?;
        self.check_opening(received, response.v, response.color_v, &response.nonce_v)?;
        Ok(())
    }

    fn check_opening(
        &self,
        received: &ReceivedRound,
        vertex: u32,
        color: Color,
        nonce: &Nonce,
    ) -> core::result::Result<(), Rejection> {
        let stored = received
            .commitment_for(vertex)
            .map_err(|err| Rejection::MissingCommitment {
                vertex,
                reason: err.to_string(),
            })?;
        if !self.scheme.verify(vertex, color, nonce, stored) {
            debug!(
                vertex,
                expected = %stored,
                actual = %self.scheme.commit(vertex, color, nonce),
                "commitment mismatch"
            );
            return Err(Rejection::CommitmentMismatch { vertex });
        }
        debug!(vertex, "commitment opened");
        Ok(())
    }
}
