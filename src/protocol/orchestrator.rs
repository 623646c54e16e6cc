use crate::config::{AcceptancePolicy, ProtocolConfig};
use crate::error::Result;
use crate::protocol::messages::ChallengeMessage;
use crate::protocol::prover::Prover;
use crate::protocol::verifier::{RoundVerdict, Verifier, VerifierStats};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    /// 1-based round number.
    pub round: u32,
    pub challenge: ChallengeMessage,
    pub verdict: RoundVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofReport {
    pub requested_rounds: u32,
    pub rounds: Vec<RoundReport>,
    pub passed: u32,
    pub policy: AcceptancePolicy,
    pub verifier_stats: VerifierStats,
    pub accepted: bool,
}

impl ProofReport {
    pub fn executed(&self) -> u32 {
        self.rounds.len() as u32
    }

    pub fn pass_ratio(&self) -> f64 {
        if self.rounds.is_empty() {
            0.0
        } else {
            self.passed as f64 / self.rounds.len() as f64
        }
    }

    pub fn first_failure(&self) -> Option<&RoundReport> {
        self.rounds.iter().find(|report| !report.verdict.is_accepted())
    }
}

/// Upper bound on the probability that a prover whose coloring is improper
/// on at least one edge survives `rounds` independent rounds.
pub fn soundness_bound(edge_count: usize, rounds: u32) -> f64 {
    if edge_count == 0 {
        return 1.0;
    }
    (1.0 - 1.0 / edge_count as f64).powf(f64::from(rounds))
}

pub struct Orchestrator {
    config: ProtocolConfig,
}

impl Orchestrator {
    pub fn new(config: ProtocolConfig) -> Self {
        Orchestrator { config }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// One full exchange: commit, challenge, respond, verify.
    pub fn run_round(prover: &mut Prover, verifier: &mut Verifier, round: u32) -> Result<RoundReport> {
        let commitments = prover.prove()?;
        verifier.receive(commitments);
        let challenge = verifier.challenge()?;
        let response = prover.respond(&challenge)?;
        let verdict = verifier.verify(&challenge, &response)?;
        Ok(RoundReport {
            round,
            challenge,
            verdict,
        })
    }

    /// Drives the configured number of rounds. Usage errors abort the run;
    /// rejected rounds are recorded and resolved by the acceptance policy.
    pub fn run(&self, prover: &mut Prover, verifier: &mut Verifier) -> Result<ProofReport> {
        self.config.validate()?;
        let policy = self.config.policy;
        if let AcceptancePolicy::Diagnostic { threshold } = policy {
            warn!(
                threshold,
                "diagnostic acceptance is not a sound proof criterion; use strict mode for verdicts"
            );
        }

        let total = self.config.rounds;
        let mut rounds = Vec::with_capacity(total as usize);
        let mut passed = 0u32;

        for round in 1..=total {
            let span = info_span!("round", round, total);
            let _guard = span.enter();

            let report = Self::run_round(prover, verifier, round)?;
            match &report.verdict {
                RoundVerdict::Accepted => {
                    passed += 1;
                    info!(edge = %report.challenge.edge(), "round passed");
                }
                RoundVerdict::Rejected(reason) => {
                    warn!(edge = %report.challenge.edge(), %reason, "round failed");
                }
            }
            let failed = !report.verdict.is_accepted();
            rounds.push(report);

            if failed && policy == AcceptancePolicy::Strict {
                break;
            }
        }

        let accepted = match policy {
            AcceptancePolicy::Strict => passed == total,
            AcceptancePolicy::Diagnostic { threshold } => {
                passed as f64 / total as f64 >= threshold
            }
        };

        let report = ProofReport {
            requested_rounds: total,
            rounds,
            passed,
            policy,
            verifier_stats: verifier.stats(),
            accepted,
        };
        info!(
            passed = report.passed,
            executed = report.executed(),
            requested = total,
            accepted,
            "proof finished"
        );
        Ok(report)
    }
}
