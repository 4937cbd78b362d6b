use crate::{
    config::SealConfig,
    constants::GENESIS_DATA,
    error::{ChainError, Result},
    seal::seal_block,
    Block,
};
use std::{
    fmt, io,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::debug;

/// Append-only sequence of sealed blocks. Never empty: index 0 is always the genesis block.
#[derive(Clone, Debug)]
pub struct Chain {
    blocks: Vec<Block>,
    config: SealConfig,
}

impl Chain {
    /// New chain at the default difficulty, holding only a freshly sealed genesis block.
    pub fn initialize() -> Result<Self> {
        Self::with_config(SealConfig::default())
    }

    pub fn with_config(config: SealConfig) -> Result<Self> {
        let genesis = genesis_block(&config, now_timestamp())?;
        Ok(Self {
            blocks: vec![genesis],
            config,
        })
    }

    /// Rebuilds a chain from previously sealed blocks, checking every proof and link.
    pub fn from_blocks(blocks: Vec<Block>, config: SealConfig) -> Result<Self> {
        let chain = Self { blocks, config };
        chain.validate()?;
        Ok(chain)
    }

    pub fn append(&mut self, data: impl Into<Vec<u8>>) -> Result<&Block> {
        self.append_at(data, now_timestamp())
    }

    /// Seals `data` on top of the current tip. On error the chain is left as it was.
    pub fn append_at(&mut self, data: impl Into<Vec<u8>>, timestamp: i64) -> Result<&Block> {
        let prev_hash = self.tip().hash().to_vec();
        let block = seal_block(prev_hash, data.into(), timestamp, &self.config)?;
        self.blocks.push(block);
        debug!("Appended block {} to the chain", self.blocks.len() - 1);
        Ok(self.tip())
    }

    /// Checks proof of work for every block, the genesis shape, and every `prev_hash` link.
    pub fn validate(&self) -> Result<()> {
        let target = self.config.target()?;
        let Some(genesis) = self.blocks.first() else {
            return Err(ChainError::ChainIntegrity {
                index: 0,
                reason: "chain has no genesis block".into(),
            });
        };
        if !genesis.prev_hash().is_empty() || genesis.data() != GENESIS_DATA {
            return Err(ChainError::ChainIntegrity {
                index: 0,
                reason: "genesis block must have an empty prev_hash and the genesis payload".into(),
            });
        }
        for (index, block) in self.blocks.iter().enumerate() {
            if !block.verify(&target) {
                return Err(ChainError::InvalidProofOfWork { index });
            }
            if index > 0 && block.prev_hash() != self.blocks[index - 1].hash() {
                return Err(ChainError::ChainIntegrity {
                    index,
                    reason: format!(
                        "prev_hash {} does not match hash of block {}",
                        hex::encode(block.prev_hash()),
                        index - 1
                    ),
                });
            }
        }
        debug!("Validated chain of {} blocks", self.blocks.len());
        Ok(())
    }

    pub fn tip(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn config(&self) -> &SealConfig {
        &self.config
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Writes every block's prev hash, data, hash and nonce, one blank line after each.
    pub fn dump<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        for block in &self.blocks {
            block.write_to(&mut out)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            writeln!(f, "{block}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Seals the genesis block: empty prev hash and the fixed genesis payload.
pub fn genesis_block(config: &SealConfig, timestamp: i64) -> Result<Block> {
    seal_block(Vec::new(), GENESIS_DATA.to_vec(), timestamp, config)
}

/// Seconds since the Unix epoch, negative if the clock is set before it.
pub fn now_timestamp() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}
