use crate::crypto::{Commitment, Nonce};
use crate::error::{ProtocolError, Result};
use crate::graph::{Color, Edge};
use serde::{Deserialize, Serialize};

/// Prover → verifier: one digest per vertex, aligned with `vertex_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    pub commitments: Vec<Commitment>,
    pub vertex_order: Vec<u32>,
}

/// Verifier → prover: the edge whose endpoints must be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeMessage {
    pub u: u32,
    pub v: u32,
}

impl ChallengeMessage {
    pub fn edge(&self) -> Edge {
        Edge::new(self.u, self.v)
    }
}

impl From<Edge> for ChallengeMessage {
    fn from(edge: Edge) -> Self {
        ChallengeMessage { u: edge.u, v: edge.v }
    }
}

/// Prover → verifier: openings of the two challenged commitments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub u: u32,
    pub v: u32,
    pub color_u: Color,
    pub color_v: Color,
    pub nonce_u: Nonce,
    pub nonce_v: Nonce,
    pub colors_differ: bool,
}

impl ResponseMessage {
    pub fn answers(&self, challenge: &ChallengeMessage) -> bool {
        self.u == challenge.u && self.v == challenge.v
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Envelope {
    Commit(CommitMessage),
    Challenge(ChallengeMessage),
    Response(ResponseMessage),
}

impl Envelope {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| ProtocolError::Codec(format!("encode json: {err}")))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| ProtocolError::Codec(format!("decode json: {err}")))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|err| ProtocolError::Codec(format!("encode binary: {err}")))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map_err(|err| ProtocolError::Codec(format!("decode binary: {err}")))
    }
}

impl From<CommitMessage> for Envelope {
    fn from(message: CommitMessage) -> Self {
        Envelope::Commit(message)
    }
}

impl From<ChallengeMessage> for Envelope {
    fn from(message: ChallengeMessage) -> Self {
        Envelope::Challenge(message)
    }
}

impl From<ResponseMessage> for Envelope {
    fn from(message: ResponseMessage) -> Self {
        Envelope::Response(message)
    }
}
