use blake3::Hasher as Blake3Hasher;
use clap::ValueEnum;
use digest::Digest;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::Sha3_256;

/// 32-byte hash primitive backing the commitment scheme.
pub trait CommitmentHash: Send + Sync {
    fn hash(&self, data: &[u8]) -> [u8; 32];
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hash;

impl CommitmentHash for Blake3Hash {
    fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = Blake3Hasher::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sha3Hash;

impl CommitmentHash for Sha3Hash {
    fn hash(&self, data: &[u8]) -> [u8; 32] {
        digest_into_array::<Sha3_256>(data)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hash;

impl CommitmentHash for Sha256Hash {
    fn hash(&self, data: &[u8]) -> [u8; 32] {
        digest_into_array::<Sha256>(data)
    }
}

fn digest_into_array<D: Digest>(data: &[u8]) -> [u8; 32] {
    let mut hasher = D::new();
    hasher.update(data);
    let output = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&output[..32]);
    out
}

/// Hash selection shared by prover and verifier through the protocol config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha3,
    Sha256,
}

impl HashAlgorithm {
    pub fn hasher(self) -> &'static dyn CommitmentHash {
        match self {
            HashAlgorithm::Blake3 => &Blake3Hash,
            HashAlgorithm::Sha3 => &Sha3Hash,
            HashAlgorithm::Sha256 => &Sha256Hash,
        }
    }
}
