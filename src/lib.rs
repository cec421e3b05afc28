//! # Dreamer Simulation Core
//!
//! Deterministic simulation core for a roguelike run: seeded rooms, a
//! lucidity-driven difficulty curve and projectile combat.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DREAMER SIM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Seeded 32-bit LCG                         │
//! │  ├── vec2.rs     - Points, rects, velocities                 │
//! │  ├── hash.rs     - State hashing for verification            │
//! │  └── time.rs     - Frame delta clamping                      │
//! │                                                              │
//! │  game/           - Run logic (deterministic)                 │
//! │  ├── room.rs     - Procedural room generation                │
//! │  ├── lucidity.rs - Lucidity meter and difficulty             │
//! │  ├── combat.rs   - Hit, status and projectile resolution     │
//! │  ├── state.rs    - Run state, pacing, snapshots              │
//! │  ├── encounter.rs- Live room entities                        │
//! │  └── tick.rs     - Frame driver and replay                   │
//! │                                                              │
//! │  config.rs       - JSON-loadable tuning                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given the same seed and the same frame script:
//! - All randomness comes from the run's LCG, drawn in a fixed order
//! - Live entities are kept in BTreeMaps for sorted iteration
//! - No wall-clock reads; timers run off frame deltas
//!
//! the run produces **identical rooms, events and state hashes**.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod config;

// Re-export commonly used types
pub use crate::core::rng::{DeterministicRng, RngState};
pub use crate::core::vec2::{Point, Rect, Vec2};
pub use crate::config::{ConfigError, RunConfig};
pub use crate::game::room::{RoomDescriptor, RoomGenerator, RoomKind};
pub use crate::game::lucidity::LucidityController;
pub use crate::game::state::{RunState, RunStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate used by the demo driver (Hz)
pub const FRAME_RATE: u32 = 60;
