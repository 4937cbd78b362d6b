use crate::{
    config::SealConfig,
    constants::PARALLEL_SEAL_WINDOW,
    error::{ChainError, Result},
    pow::{count_leading_zero_bits, Preimage, Target},
    Block, Hash,
};
use rayon::prelude::*;
use tracing::{info, warn};

/// Seals a block by searching nonces from zero upward until the digest falls below the
/// configured target.
///
/// Both search modes return the lowest winning nonce, so a parallel seal produces the
/// same block as a sequential one. Fails with `SealTimeout` when `max_attempts` nonces
/// have been tried without success.
pub fn seal_block(
    prev_hash: Vec<u8>,
    data: Vec<u8>,
    timestamp: i64,
    config: &SealConfig,
) -> Result<Block> {
    let target = config.target()?;
    let preimage = Preimage::new(&prev_hash, &data, timestamp);
    let limit = config.max_attempts.unwrap_or(u64::MAX);

    let found = if config.parallel {
        search_parallel(&preimage, &target, limit)
    } else {
        search_sequential(&preimage, &target, limit)
    };

    let Some((nonce, hash)) = found else {
        warn!(
            "Gave up sealing after {} nonces at difficulty {}",
            limit,
            target.difficulty_bits()
        );
        return Err(ChainError::SealTimeout { attempts: limit });
    };

    info!(
        "Sealed block with nonce {} ({} leading zero bits) and hash {}",
        nonce,
        count_leading_zero_bits(&hash),
        hex::encode(hash)
    );

    Ok(Block::sealed(prev_hash, data, timestamp, hash, nonce))
}

fn search_sequential(preimage: &Preimage, target: &Target, limit: u64) -> Option<(u64, Hash)> {
    (0..limit)
        .map(|nonce| (nonce, preimage.digest(nonce)))
        .find(|(_, hash)| target.is_met_by(hash))
}

fn search_parallel(preimage: &Preimage, target: &Target, limit: u64) -> Option<(u64, Hash)> {
    search_windows(preimage, target, limit, PARALLEL_SEAL_WINDOW)
}

/// Scans `0..limit` in consecutive windows, each one split across the rayon pool.
/// The first window with a hit holds the lowest winning nonce.
fn search_windows(
    preimage: &Preimage,
    target: &Target,
    limit: u64,
    window: u64,
) -> Option<(u64, Hash)> {
    let mut start = 0u64;
    while start < limit {
        let end = start.saturating_add(window.max(1)).min(limit);
        let found = (start..end)
            .into_par_iter()
            .map(|nonce| (nonce, preimage.digest(nonce)))
            .find_first(|(_, hash)| target.is_met_by(hash));
        if found.is_some() {
            return found;
        }
        start = end;
    }
    None
}
