use thiserror::Error;

use crate::constants::HASH_BITS;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("nonce search gave up after {attempts} attempts")]
    SealTimeout { attempts: u64 },

    #[error("chain integrity broken at block {index}: {reason}")]
    ChainIntegrity { index: usize, reason: String },

    #[error("block {index} does not carry a valid proof of work")]
    InvalidProofOfWork { index: usize },

    #[error("difficulty of {0} bits is out of range (max {max})", max = HASH_BITS)]
    InvalidDifficulty(u32),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChainError>;
