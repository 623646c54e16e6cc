use crate::crypto::hash::{CommitmentHash, HashAlgorithm};
use crate::graph::Color;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

pub const NONCE_LEN: usize = 16;
pub const DIGEST_LEN: usize = 32;

const DOMAIN_TAG: &[u8] = b"zkp-k-coloring/commit/v1";

/// Single-use 128-bit blinding value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nonce(pub [u8; NONCE_LEN]);

impl Nonce {
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rng.fill(&mut bytes);
        Nonce(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", hex::encode(self.0))
    }
}

/// Digest standing in for a hidden (vertex, color) pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub [u8; DIGEST_LEN]);

impl Commitment {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Full-width comparison; no prefix matching.
    pub fn matches(&self, other: &Commitment) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(self.0))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Hash commitment to `(vertex, color, nonce)`.
///
/// The preimage is the domain tag followed by fixed-width big-endian fields,
/// so no two distinct triples share an encoding. Binding and hiding come
/// from the collision and preimage resistance of the selected hash.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentScheme {
    pub algorithm: HashAlgorithm,
}

impl CommitmentScheme {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        CommitmentScheme { algorithm }
    }

    pub fn commit(&self, vertex: u32, color: Color, nonce: &Nonce) -> Commitment {
        commit_with(self.algorithm.hasher(), vertex, color, nonce)
    }

    pub fn verify(&self, vertex: u32, color: Color, nonce: &Nonce, commitment: &Commitment) -> bool {
        self.commit(vertex, color, nonce).matches(commitment)
    }
}

pub fn commit_with(
    hasher: &dyn CommitmentHash,
    vertex: u32,
    color: Color,
    nonce: &Nonce,
) -> Commitment {
    Commitment(hasher.hash(&encode_preimage(vertex, color, nonce)))
}

fn encode_preimage(vertex: u32, color: Color, nonce: &Nonce) -> Vec<u8> {
    let mut data = Vec::with_capacity(DOMAIN_TAG.len() + 8 + NONCE_LEN);
    data.extend_from_slice(DOMAIN_TAG);
    data.extend_from_slice(&vertex.to_be_bytes());
    data.extend_from_slice(&color.to_be_bytes());
    data.extend_from_slice(nonce.as_bytes());
    data
}
