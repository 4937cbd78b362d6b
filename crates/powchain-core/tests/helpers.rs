use powchain_core::{pow::block_digest, Block, Chain, SealConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const TEST_DIFFICULTY: u32 = 10;

pub fn easy_config() -> SealConfig {
    SealConfig::default().with_difficulty(TEST_DIFFICULTY)
}

pub fn easy_chain() -> Chain {
    Chain::with_config(easy_config()).expect("Failed to seal genesis block")
}

/// Deterministic pseudo-random payloads of varying length, including empty ones.
pub fn random_payloads(seed: u64, count: usize) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(0..64);
            (0..len).map(|_| rng.gen()).collect()
        })
        .collect()
}

pub fn recompute(block: &Block) -> [u8; 32] {
    block_digest(block.prev_hash(), block.data(), block.timestamp(), block.nonce())
}

pub fn assert_linked(chain: &Chain) {
    for pair in chain.blocks().windows(2) {
        assert_eq!(pair[1].prev_hash(), pair[0].hash());
    }
}
