use crate::block::Block;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::info;

/// Leading zero hex characters of a raw digest, two per zero byte.
pub fn count_leading_zero_hex(digest: &[u8]) -> usize {
    let mut total = 0;
    for b in digest {
        if *b == 0 {
            total += 2;
        } else {
            if b >> 4 == 0 {
                total += 1;
            }
            break;
        }
    }
    total
}

/// Searches nonces in parallel, starting at the block's current nonce, until
/// a hash has at least `difficulty` leading zero hex characters.
/// Returns the winning nonce and its hex digest; the caller installs both.
pub fn find_nonce_parallel(block: &Block, difficulty: usize) -> (u64, String) {
    // Only the nonce varies per attempt; everything else is a fixed prefix.
    let prefix = format!(
        "{}{}{}{}",
        block.timestamp, block.data, block.previous_hash, block.quantum_hash
    );

    let found = (block.nonce..u64::MAX)
        .into_par_iter()
        .find_any(|nonce| {
            let digest = Sha256::digest(format!("{prefix}{nonce}").as_bytes());
            count_leading_zero_hex(&digest) >= difficulty
        })
        .expect("nonce space exhausted (practically impossible)");

    let hash = hex::encode(Sha256::digest(format!("{prefix}{found}").as_bytes()));
    info!(nonce = found, hash = %hash, "parallel nonce search finished");
    (found, hash)
}
