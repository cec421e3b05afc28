//! Run State
//!
//! Everything that lives for the length of one run: the seeded RNG, the
//! lucidity meter, the player, the room counter and the stats. Uses explicit
//! `&mut` access only; nothing here holds a reference to a collaborator.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::info;

use crate::config::RunConfig;
use crate::core::hash::{compute_state_hash, StateHash, StateHasher};
use crate::core::rng::{DeterministicRng, RngState};
use crate::core::time::sanitize_delta;
use crate::core::vec2::Vec2;
use crate::game::amulet::AmuletDefinition;
use crate::game::events::RunEvent;
use crate::game::lucidity::LucidityController;
use crate::game::player::PlayerState;
use crate::game::projectile::ProjectileState;
use crate::game::room::{RoomDescriptor, RoomGenerator, RoomKind};

/// Seed offset for the cosmetic effects stream.
const FX_SEED_SALT: u32 = 0x9E37_79B9;

// =============================================================================
// RUN PACING
// =============================================================================

/// Which room comes next.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Chance a non-boss room past `elite_min_room` is elite
    pub elite_room_chance: f64,
    /// Elite rooms only appear after this room number
    pub elite_min_room: u32,
    /// Every Nth room is a boss room
    pub boss_room_interval: u32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            elite_room_chance: 0.3,
            elite_min_room: 3,
            boss_room_interval: 10,
        }
    }
}

impl PacingConfig {
    /// Room kind for a room number and an elite roll.
    pub fn room_kind(&self, room_number: u32, elite_roll: bool) -> RoomKind {
        let boss_room = room_number > 0 && room_number.checked_rem(self.boss_room_interval) == Some(0);

        if boss_room {
            RoomKind::Boss
        } else if elite_roll && room_number > self.elite_min_room {
            RoomKind::Elite
        } else {
            RoomKind::Normal
        }
    }
}

// =============================================================================
// RUN STATS
// =============================================================================

/// Statistics accumulated over a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Rooms whose enemies were all defeated
    pub rooms_cleared: u32,
    /// Enemies defeated
    pub enemies_defeated: u32,
    /// Amulets picked up
    pub amulet_count: u32,
    /// Damage dealt by projectiles
    pub total_damage_dealt: u64,
    /// Damage taken from contact
    pub total_damage_received: u64,
    /// Lucidity when the run ended
    pub final_lucidity: f64,
    /// Run seed
    pub seed: u32,
}

impl RunStats {
    /// Empty stats for a seed.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Add stats to a hasher.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.rooms_cleared);
        hasher.update_u32(self.enemies_defeated);
        hasher.update_u32(self.amulet_count);
        hasher.update_u64(self.total_damage_dealt);
        hasher.update_u64(self.total_damage_received);
        hasher.update_f64(self.final_lucidity);
        hasher.update_u32(self.seed);
    }
}

// =============================================================================
// RUN STATE
// =============================================================================

/// Complete state of a run.
#[derive(Clone, Debug)]
pub struct RunState {
    /// Run seed
    pub seed: u32,

    /// Room generation stream. Only room transitions draw from it.
    pub rng: DeterministicRng,

    /// Cosmetic stream (stun jitter); never affects rooms
    pub fx_rng: DeterministicRng,

    /// Lucidity meter
    pub lucidity: LucidityController,

    /// Accumulated stats
    pub stats: RunStats,

    /// The player
    pub player: PlayerState,

    /// Rooms loaded so far (the current room's number)
    pub room_number: u32,

    /// Frames stepped
    pub frame: u32,

    /// Run clock
    pub elapsed_ms: f64,

    /// Player died
    pub ended: bool,

    /// Tuning
    pub config: RunConfig,

    /// Events generated since the last `take_events`
    pub pending_events: Vec<RunEvent>,

    room_generator: RoomGenerator,
}

impl RunState {
    /// Start a run.
    pub fn new(seed: u32, config: RunConfig) -> Self {
        Self {
            seed,
            rng: DeterministicRng::new(seed),
            fx_rng: DeterministicRng::new(seed ^ FX_SEED_SALT),
            lucidity: LucidityController::new(&config.lucidity),
            stats: RunStats::new(seed),
            player: PlayerState::new(&config.player),
            room_number: 0,
            frame: 0,
            elapsed_ms: 0.0,
            ended: false,
            room_generator: RoomGenerator::new(&config.room),
            config,
            pending_events: Vec::new(),
        }
    }

    /// Start a run with default tuning.
    pub fn with_seed(seed: u32) -> Self {
        Self::new(seed, RunConfig::default())
    }

    /// Run clock in whole milliseconds.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.elapsed_ms as u64
    }

    /// Has the run ended?
    #[inline]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Advance the room counter and decide the next room kind.
    ///
    /// The elite roll is drawn on every call, boss rooms included.
    pub fn next_room_kind(&mut self) -> RoomKind {
        self.room_number += 1;
        let elite_roll = self.rng.chance(self.config.pacing.elite_room_chance);
        self.config.pacing.room_kind(self.room_number, elite_roll)
    }

    /// Move to the next room and generate it.
    pub fn load_room(&mut self) -> RoomDescriptor {
        let kind = self.next_room_kind();
        self.load_room_of_kind(kind)
    }

    /// Generate a room of a given kind without advancing pacing. Debug hook.
    pub fn load_room_of_kind(&mut self, kind: RoomKind) -> RoomDescriptor {
        let room = self.room_generator.generate(&mut self.rng, kind);

        info!(
            room = self.room_number,
            kind = %kind,
            enemies = room.enemies.len(),
            items = room.items.len(),
            "room loaded"
        );
        self.push_event(RunEvent::room_loaded(
            self.frame,
            self.room_number,
            kind,
            room.enemies.len() as u32 + u32::from(room.boss.is_some()),
            room.items.len() as u32,
        ));

        room
    }

    /// Advance the run clock and decay lucidity.
    ///
    /// Lucidity is ticked before anything else in the frame reads the
    /// multipliers.
    pub fn advance_clock(&mut self, delta_ms: f64) {
        let delta = sanitize_delta(delta_ms);
        self.frame = self.frame.wrapping_add(1);
        self.elapsed_ms += delta;
        self.lucidity.tick(delta);
    }

    /// Pick up an amulet.
    pub fn collect_amulet(&mut self, amulet: AmuletDefinition) {
        self.player.collect_amulet(amulet);
        self.stats.amulet_count += 1;
        self.push_event(RunEvent::amulet_collected(self.frame, amulet.kind, amulet.value));
    }

    /// Fire a projectile from the player, if off cooldown.
    pub fn fire_projectile(&mut self, direction: Vec2) -> Option<ProjectileState> {
        if self.ended {
            return None;
        }
        let now = self.now_ms();
        self.player.shoot(direction, &self.config.player, now)
    }

    /// Record a cleared room.
    pub fn room_cleared(&mut self) {
        self.stats.rooms_cleared += 1;
        info!(room = self.room_number, cleared = self.stats.rooms_cleared, "room cleared");
        self.push_event(RunEvent::room_cleared(self.frame, self.room_number));
    }

    /// End the run, recording the final lucidity. Idempotent.
    pub fn end_run(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.stats.final_lucidity = self.lucidity.lucidity();

        info!(
            rooms_cleared = self.stats.rooms_cleared,
            enemies_defeated = self.stats.enemies_defeated,
            final_lucidity = self.stats.final_lucidity,
            "run ended"
        );
        self.push_event(RunEvent::run_ended(
            self.frame,
            self.stats.rooms_cleared,
            self.stats.final_lucidity,
        ));
    }

    /// Stats as they stand now, with the current lucidity as final.
    pub fn stats_snapshot(&self) -> RunStats {
        let mut stats = self.stats.clone();
        if !self.ended {
            stats.final_lucidity = self.lucidity.lucidity();
        }
        stats
    }

    /// End the run and hand out the stats.
    pub fn finish(mut self) -> RunStats {
        self.end_run();
        self.stats
    }

    /// Compute hash of the current run state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.now_ms(), self.seed, |hasher| {
            let rng = self.rng.state();
            hasher.update_u32(rng.seed);
            hasher.update_u32(rng.current);
            let fx = self.fx_rng.state();
            hasher.update_u32(fx.current);

            hasher.update_f64(self.elapsed_ms);
            hasher.update_u32(self.frame);
            hasher.update_u32(self.room_number);
            hasher.update_f64(self.lucidity.lucidity());
            self.stats.hash_into(hasher);

            hasher.update_u32(self.player.health);
            hasher.update_f64(self.player.speed);
            hasher.update_u32(self.player.inventory.len() as u32);
            for amulet in &self.player.inventory {
                hasher.update_u8(amulet.kind as u8);
                hasher.update_u32(amulet.value);
            }
            hasher.update_bool(self.ended);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push an event.
    pub fn push_event(&mut self, event: RunEvent) {
        self.pending_events.push(event);
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Capture everything needed to resume this run.
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            seed: self.seed,
            rng: self.rng.state(),
            fx_rng: self.fx_rng.state(),
            lucidity: self.lucidity.clone(),
            stats: self.stats.clone(),
            player: self.player.clone(),
            room_number: self.room_number,
            frame: self.frame,
            elapsed_ms: self.elapsed_ms,
            ended: self.ended,
        }
    }

    /// Resume a run from a snapshot.
    pub fn restore(snapshot: RunSnapshot, config: RunConfig) -> Self {
        Self {
            seed: snapshot.seed,
            rng: DeterministicRng::from(snapshot.rng),
            fx_rng: DeterministicRng::from(snapshot.fx_rng),
            lucidity: snapshot.lucidity,
            stats: snapshot.stats,
            player: snapshot.player,
            room_number: snapshot.room_number,
            frame: snapshot.frame,
            elapsed_ms: snapshot.elapsed_ms,
            ended: snapshot.ended,
            room_generator: RoomGenerator::new(&config.room),
            config,
            pending_events: Vec::new(),
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Snapshot encode/decode failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// JSON encoding failed
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary encoding failed
    #[error("snapshot binary: {0}")]
    Binary(#[from] bincode::Error),
}

/// Serializable run state, minus tuning and pending events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    /// Run seed
    pub seed: u32,
    /// Room stream cursor
    pub rng: RngState,
    /// Cosmetic stream cursor
    pub fx_rng: RngState,
    /// Lucidity meter
    pub lucidity: LucidityController,
    /// Stats so far
    pub stats: RunStats,
    /// Player
    pub player: PlayerState,
    /// Current room number
    pub room_number: u32,
    /// Frames stepped
    pub frame: u32,
    /// Run clock
    pub elapsed_ms: f64,
    /// Player died
    pub ended: bool,
}

impl RunSnapshot {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

// =============================================================================
// TESTS
// =============================================================================
