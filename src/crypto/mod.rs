pub mod commitment;
pub mod hash;

pub use commitment::{commit_with, Commitment, CommitmentScheme, Nonce, DIGEST_LEN, NONCE_LEN};
pub use hash::{Blake3Hash, CommitmentHash, HashAlgorithm, Sha256Hash, Sha3Hash};
