//! Shared utilities: easing curves and stable per-instance hashing.

pub mod easing;
pub mod hash;
