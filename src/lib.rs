pub mod config;
pub mod crypto;
pub mod error;
pub mod graph;
pub mod protocol;
pub mod utils;

pub use config::{AcceptancePolicy, ProtocolConfig, DEFAULT_ROUNDS};
pub use crypto::*;
pub use error::{ProtocolError, Result};
pub use graph::*;
pub use protocol::{
	messages::{ChallengeMessage, CommitMessage, Envelope, ResponseMessage},
	orchestrator::{soundness_bound, Orchestrator, ProofReport, RoundReport},
	prover::Prover,
	verifier::{Rejection, RoundVerdict, Verifier, VerifierStats},
};
pub use utils::serialization::{load_graph_instance, parse_instance, GraphInstance};
