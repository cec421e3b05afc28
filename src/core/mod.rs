//! Core deterministic primitives.
//!
//! Everything here is free of wall-clock time and global state, so a run
//! can be reproduced from its seed alone.

pub mod vec2;
pub mod rng;
pub mod hash;
pub mod time;

// Re-export core types
pub use vec2::{Point, Rect, Vec2};
pub use rng::{DeterministicRng, RngState};
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use time::sanitize_delta;
