//! State Hashing for Verification
//!
//! Deterministic hashing of run state for:
//! - Replay validation (same seed + same frames = same hash)
//! - Comparing snapshots without diffing every field

use sha2::{Sha256, Digest};
use super::vec2::Point;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for run state.
///
/// Wraps SHA-256 with helpers for the crate's value types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for run state.
    pub fn for_run_state() -> Self {
        Self::new(b"DREAMER_RUN_STATE_V1")
    }

    /// Create hasher for room descriptors.
    pub fn for_room() -> Self {
        Self::new(b"DREAMER_ROOM_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an f64, hashed by its exact bit pattern.
    #[inline]
    pub fn update_f64(&mut self, value: f64) {
        self.update_u64(value.to_bits());
    }

    /// Update with a room-space point.
    #[inline]
    pub fn update_point(&mut self, value: Point) {
        self.update_i32(value.x);
        self.update_i32(value.y);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a length-prefixed string.
    #[inline]
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.hasher.update(value.as_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for run verification.
///
/// Called by `RunState::compute_hash()`; the closure adds state-specific data
/// after the run clock and seed.
pub fn compute_state_hash<F>(elapsed_ms: u64, seed: u32, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_run_state();

    // Always hash clock and seed first
    hasher.update_u64(elapsed_ms);
    hasher.update_u32(seed);

    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
