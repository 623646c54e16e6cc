pub mod messages;
pub mod orchestrator;
pub mod prover;
pub mod verifier;

pub use messages::{ChallengeMessage, CommitMessage, Envelope, ResponseMessage};
pub use orchestrator::{soundness_bound, Orchestrator, ProofReport, RoundReport};
pub use prover::Prover;
pub use verifier::{Rejection, RoundVerdict, Verifier, VerifierStats};
