pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod pow;
pub mod seal;

use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt, io};

pub use chain::Chain;
pub use config::SealConfig;
pub use error::{ChainError, Result};
pub use pow::Target;
pub use seal::seal_block;

pub type Hash = [u8; 32];

/// A sealed block. Only the sealer builds these, and nothing mutates them afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    timestamp: i64,
    #[serde(with = "hex")]
    data: Vec<u8>,
    #[serde(with = "hex")]
    prev_hash: Vec<u8>,
    #[serde(with = "hex")]
    hash: Hash,
    nonce: u64,
}

impl Block {
    pub(crate) fn sealed(
        prev_hash: Vec<u8>,
        data: Vec<u8>,
        timestamp: i64,
        hash: Hash,
        nonce: u64,
    ) -> Self {
        Self {
            timestamp,
            data,
            prev_hash,
            hash,
            nonce,
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Payload as text, with invalid UTF-8 replaced.
    pub fn data_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Empty for the genesis block.
    pub fn prev_hash(&self) -> &[u8] {
        &self.prev_hash
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn compute_hash(&self) -> Hash {
        pow::block_digest(&self.prev_hash, &self.data, self.timestamp, self.nonce)
    }

    /// Writes prev hash, data, hash and nonce on four lines. The payload bytes are
    /// written as they are, without UTF-8 replacement.
    pub fn write_to<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Prev. hash: {}", hex::encode(&self.prev_hash))?;
        out.write_all(b"Data: ")?;
        out.write_all(&self.data)?;
        writeln!(out)?;
        writeln!(out, "Hash: {}", hex::encode(self.hash))?;
        writeln!(out, "Nonce: {}", self.nonce)
    }

    /// Recomputes the digest and checks it against the stored hash and `target`.
    /// Does not look at chain linkage.
    pub fn verify(&self, target: &Target) -> bool {
        self.compute_hash() == self.hash && target.is_met_by(&self.hash)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prev. hash: {}", hex::encode(&self.prev_hash))?;
        writeln!(f, "Data: {}", self.data_lossy())?;
        writeln!(f, "Hash: {}", hex::encode(self.hash))?;
        write!(f, "Nonce: {}", self.nonce)
    }
}
