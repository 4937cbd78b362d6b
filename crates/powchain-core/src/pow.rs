use crate::{
    constants::{BYTE, HASH_BITS, HASH_SIZE},
    error::{ChainError, Result},
    Hash,
};
use sha2::{Digest, Sha256};
use std::fmt;

/// The proof-of-work threshold `2^(256 - difficulty_bits)`.
///
/// A digest meets the target when, read as a big-endian unsigned integer, it is
/// strictly smaller than the threshold. With zero difficulty the threshold is
/// `2^256`, which does not fit in 32 bytes, so it is kept as `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    difficulty_bits: u32,
    threshold: Option<Hash>,
}

impl Target {
    pub fn from_difficulty(difficulty_bits: u32) -> Result<Self> {
        if difficulty_bits > HASH_BITS {
            return Err(ChainError::InvalidDifficulty(difficulty_bits));
        }
        let threshold = (difficulty_bits > 0).then(|| {
            let bit = (HASH_BITS - difficulty_bits) as usize;
            let mut out = [0u8; HASH_SIZE];
            out[HASH_SIZE - 1 - bit / BYTE] = 1 << (bit % BYTE);
            out
        });
        Ok(Self {
            difficulty_bits,
            threshold,
        })
    }

    pub fn difficulty_bits(&self) -> u32 {
        self.difficulty_bits
    }

    /// Big-endian bytes of the threshold, `None` when it is `2^256`.
    pub fn threshold(&self) -> Option<Hash> {
        self.threshold
    }

    pub fn is_met_by(&self, hash: &Hash) -> bool {
        // Lexicographic order on big-endian byte arrays is numeric order.
        match &self.threshold {
            Some(threshold) => hash < threshold,
            None => true,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.threshold {
            Some(threshold) => f.write_str(&hex::encode(threshold)),
            None => write!(f, "2^{HASH_BITS}"),
        }
    }
}

/// Hasher state primed with every field except the nonce.
///
/// The sealing loop clones this state once per attempt instead of rehashing
/// `prev_hash`, `data` and the timestamp every time.
#[derive(Clone)]
pub struct Preimage {
    prefix: Sha256,
}

impl Preimage {
    pub fn new(prev_hash: &[u8], data: &[u8], timestamp: i64) -> Self {
        let mut prefix = Sha256::new();
        prefix.update(prev_hash);
        prefix.update(data);
        prefix.update(timestamp.to_string().as_bytes());
        Self { prefix }
    }

    pub fn digest(&self, nonce: u64) -> Hash {
        let mut hasher = self.prefix.clone();
        hasher.update(nonce.to_string().as_bytes());
        let digest = hasher.finalize();
        let mut out = [0u8; HASH_SIZE];
        out.copy_from_slice(&digest[..]);
        out
    }
}

/// `SHA256(prev_hash || data || decimal(timestamp) || decimal(nonce))`.
pub fn block_digest(prev_hash: &[u8], data: &[u8], timestamp: i64, nonce: u64) -> Hash {
    Preimage::new(prev_hash, data, timestamp).digest(nonce)
}

pub fn count_leading_zero_bits(hash: &Hash) -> u32 {
    let mut total = 0u32;
    for b in hash {
        if *b == 0 {
            total += 8;
        } else {
            total += b.leading_zeros();
            break;
        }
    }
    total
}
