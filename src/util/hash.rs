//! Stable hashing of instance indices into animation phases.

use std::f32::consts::TAU;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// Stable 64-bit hash of an instance index.
///
/// `FxHasher` is seedless, so the value is identical across runs and
/// platforms.
pub fn hash_index(index: usize, salt: u64) -> u64 {
    let mut hasher = FxHasher::default();
    salt.hash(&mut hasher);
    (index as u64).hash(&mut hasher);
    // Fx mixes low bits poorly for small integers; fold once more.
    let h = hasher.finish();
    h ^ (h >> 29).wrapping_mul(0xbf58_476d_1ce4_e5b9)
}

/// Unit-interval value in `[0, 1)` derived from an instance index.
pub fn unit_from_index(index: usize, salt: u64) -> f32 {
    // 24 bits fit exactly in an f32 mantissa.
    (hash_index(index, salt) >> 40) as f32 / (1u64 << 24) as f32
}

/// Stable animation phase in `[0, 2π)` for an instance index.
pub fn phase_for_index(index: usize) -> f32 {
    unit_from_index(index, 0x9e37_79b9) * TAU
}
