//! Game Logic Module
//!
//! All run simulation code. Deterministic for a given seed and frame script.
//!
//! ## Module Structure
//!
//! - `amulet`: Amulet table, rarity draw, projectile modifier fold
//! - `room`: Procedural room generation
//! - `lucidity`: Lucidity meter and derived difficulty
//! - `enemy`: Enemy archetypes and status effects
//! - `player`: Player health, inventory, shooting
//! - `projectile`: Projectile lifecycle (pierce, ricochet, expiry)
//! - `combat`: Projectile/enemy and player/enemy resolution
//! - `state`: Run state, pacing, stats, snapshots
//! - `encounter`: Live entities of the current room
//! - `tick`: Frame driver and replay
//! - `events`: Run events for replay/verification

pub mod amulet;
pub mod room;
pub mod lucidity;
pub mod enemy;
pub mod player;
pub mod projectile;
pub mod combat;
pub mod state;
pub mod encounter;
pub mod tick;
pub mod events;

// Re-export key types
pub use amulet::{AmuletDefinition, AmuletKind, ProjectileModifiers};
pub use room::{RoomDescriptor, RoomGenerator, RoomKind};
pub use lucidity::{DifficultyModifiers, LucidityBand, LucidityController};
pub use enemy::{EnemyKind, EnemyState, EnemyStatus};
pub use player::PlayerState;
pub use projectile::{ProjectileFate, ProjectileState};
pub use combat::{CombatConfig, CombatOutcome};
pub use state::{RunSnapshot, RunState, RunStats};
pub use encounter::Encounter;
pub use tick::{FrameInput, FrameResult, OverlapEvent};
pub use events::RunEvent;
