//! Seeded generators for each part of the dashboard.
//!
//! Every random draw made while rendering comes from one of these, so a render is fully
//! determined by the configured seed (plus the nonce of a re-run click).

use rand::rngs::StdRng;
use rand::SeedableRng;
use sha3::Digest;

/// Generator for the run history table.
pub fn history_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generator for a derived view, such as the summary owners or a pipeline's query history.
///
/// Different views get independent streams so that drawing more values in one does not shift
/// the values of another.
pub fn view_rng(seed: u64, view: &str) -> StdRng {
    StdRng::seed_from_u64(derive_seed(seed, &[view.as_bytes()]))
}

/// Generator for a single re-run click.
pub fn rerun_rng(seed: u64, pipeline: &str, nonce: u64) -> StdRng {
    StdRng::seed_from_u64(derive_seed(
        seed,
        &[b"rerun", pipeline.as_bytes(), &nonce.to_le_bytes()],
    ))
}

fn derive_seed(seed: u64, parts: &[&[u8]]) -> u64 {
    let mut hasher = sha3::Sha3_256::new();
    Digest::update(&mut hasher, seed.to_le_bytes());
    for part in parts {
        Digest::update(&mut hasher, (part.len() as u64).to_le_bytes());
        Digest::update(&mut hasher, part);
    }
    let digest = hasher.finalize();

    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(out)
}
