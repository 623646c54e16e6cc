use thiserror::Error;

pub type Result<T> = core::result::Result<T, ProtocolError>;

/// Structural and usage failures of the proof system.
///
/// A commitment that fails to open is not represented here: the verifier
/// reports it as a rejected [`crate::protocol::verifier::RoundVerdict`].
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("vertex {0} is not part of the graph")]
    UnknownVertex(u32),

    #[error("vertices {0} and {1} are not joined by an edge")]
    NotAnEdge(u32, u32),

    #[error("self-loop on vertex {0}")]
    SelfLoop(u32),

    #[error("no active round: commitments have not been produced or received")]
    NoActiveRound,

    #[error("palette of {colors} colors exceeds the {vertices} vertices it colors")]
    PaletteTooLarge { colors: u32, vertices: usize },

    #[error("graph has no edges to challenge")]
    EmptyGraph,

    #[error("vertex {vertex} maps to commitment index {index}, but only {len} commitments were received")]
    IndexOutOfRange { vertex: u32, index: usize, len: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("codec error: {0}")]
    Codec(String),
}

impl ProtocolError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ProtocolError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}
