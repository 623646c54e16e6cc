use crate::crypto::{CommitmentScheme, HashAlgorithm};
use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_ROUNDS: u32 = 20;

/// How the orchestrator turns per-round verdicts into a final verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// Stop at the first rejected round; accept only if every round passed.
    #[default]
    Strict,
    /// Run every round and accept when the pass ratio reaches `threshold`.
    ///
    /// Not sound as a proof criterion: a prover with an improper coloring
    /// passes most rounds. Use for collecting statistics only.
    Diagnostic { threshold: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    pub rounds: u32,
    pub hash: HashAlgorithm,
    pub policy: AcceptancePolicy,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            rounds: DEFAULT_ROUNDS,
            hash: HashAlgorithm::default(),
            policy: AcceptancePolicy::default(),
        }
    }
}

impl ProtocolConfig {
    pub fn scheme(&self) -> CommitmentScheme {
        CommitmentScheme::new(self.hash)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ProtocolConfig =
            toml::from_str(text).map_err(|err| ProtocolError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|err| ProtocolError::Config(err.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(ProtocolError::Config("rounds must be greater than zero".into()));
        }
        if let AcceptancePolicy::Diagnostic { threshold } = self.policy {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ProtocolError::Config(format!(
                    "diagnostic threshold {threshold} is outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive_toml_round_trip() {
        let config = ProtocolConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(ProtocolConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = ProtocolConfig::from_toml_str("rounds = 50\n").unwrap();
        assert_eq!(config.rounds, 50);
        assert_eq!(config.policy, AcceptancePolicy::Strict);
        assert_eq!(config.hash, HashAlgorithm::Blake3);
    }

    #[test]
    fn parses_diagnostic_policy_and_hash() {
        let text = r#"
            rounds = 8
            hash = "sha256"

            [policy]
            mode = "diagnostic"
            threshold = 0.95
        "#;
        let config = ProtocolConfig::from_toml_str(text).unwrap();
        assert_eq!(config.hash, HashAlgorithm::Sha256);
        assert_eq!(config.policy, AcceptancePolicy::Diagnostic { threshold: 0.95 });
    }

    #[test]
    fn rejects_zero_rounds_and_bad_threshold() {
        assert!(matches!(
            ProtocolConfig::from_toml_str("rounds = 0"),
            Err(ProtocolError::Config(_))
        ));
        let text = "[policy]\nmode = \"diagnostic\"\nthreshold = 1.5\n";
        assert!(matches!(
            ProtocolConfig::from_toml_str(text),
            Err(ProtocolError::Config(_))
        ));
    }
}
