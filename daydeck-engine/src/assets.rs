//! Contract with the offline illustration pipeline.
//!
//! The pipeline maps each concept to a static image file; the engine's
//! only obligation is a stable identifier per concept so the same card
//! always resolves to the same asset.

use std::hash::Hasher;
use twox_hash::XxHash64;

const ASSET_HASH_SEED: u64 = 0;

/// Stable 16-hex-digit identifier for a concept's illustration asset.
#[must_use]
pub fn asset_key(concept: &str) -> String {
    let mut hasher = XxHash64::with_seed(ASSET_HASH_SEED);
    hasher.write(concept.as_bytes());
    format!("{:016x}", hasher.finish())
}
