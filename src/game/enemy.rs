//! Enemies and Status Effects
//!
//! Enemy archetypes, live enemy state and the slow/stun timers.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::rng::DeterministicRng;
use crate::core::time::sanitize_delta;
use crate::core::vec2::Point;
use crate::game::lucidity::DifficultyModifiers;

/// Speed factor applied while slowed.
pub const SLOWED_SPEED_FACTOR: f64 = 0.5;

/// Chance per frame of a stun jitter nudge.
pub const STUN_JITTER_CHANCE: f64 = 0.1;

/// Maximum jitter offset per axis while stunned.
pub const STUN_JITTER_RADIUS: i32 = 3;

/// Enemy archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum EnemyKind {
    /// Basic trauma
    #[default]
    Normal = 0,
    /// Tougher, faster variant
    Elite = 1,
    /// Room boss
    Boss = 2,
}

/// Base stats for an archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyStats {
    /// Starting health
    pub health: i32,
    /// Contact damage before lucidity scaling
    pub damage: u32,
    /// Movement speed before lucidity scaling
    pub speed: u32,
}

impl EnemyKind {
    /// Base stats table.
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Normal => EnemyStats { health: 30, damage: 5, speed: 100 },
            EnemyKind::Elite => EnemyStats { health: 60, damage: 10, speed: 120 },
            EnemyKind::Boss => EnemyStats { health: 150, damage: 20, speed: 80 },
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Normal => "normal",
            EnemyKind::Elite => "elite",
            EnemyKind::Boss => "boss",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown enemy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown enemy kind: {0:?}")]
pub struct EnemyKindParseError(pub String);

impl FromStr for EnemyKind {
    type Err = EnemyKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(EnemyKind::Normal),
            "elite" => Ok(EnemyKind::Elite),
            "boss" => Ok(EnemyKind::Boss),
            _ => Err(EnemyKindParseError(s.to_string())),
        }
    }
}

// =============================================================================
// STATUS EFFECTS
// =============================================================================

/// Slow and stun timers. Independent; both may be active at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyStatus {
    /// Movement halved
    pub slowed: bool,
    /// Remaining slow time
    pub slow_remaining_ms: f64,
    /// Movement stopped
    pub stunned: bool,
    /// Remaining stun time
    pub stun_remaining_ms: f64,
}

impl EnemyStatus {
    /// Apply (or refresh) slow.
    pub fn apply_slow(&mut self, duration_ms: f64) {
        self.slowed = true;
        self.slow_remaining_ms = duration_ms;
    }

    /// Apply (or refresh) stun.
    pub fn apply_stun(&mut self, duration_ms: f64) {
        self.stunned = true;
        self.stun_remaining_ms = duration_ms;
    }

    /// Count active timers down by one frame delta.
    ///
    /// A timer reaching <= 0 clears its flag. Non-finite or negative deltas
    /// are treated as zero.
    pub fn update(&mut self, delta_ms: f64) {
        let delta = sanitize_delta(delta_ms);

        if self.slowed {
            self.slow_remaining_ms -= delta;
            if self.slow_remaining_ms <= 0.0 {
                self.slowed = false;
                self.slow_remaining_ms = 0.0;
            }
        }

        if self.stunned {
            self.stun_remaining_ms -= delta;
            if self.stun_remaining_ms <= 0.0 {
                self.stunned = false;
                self.stun_remaining_ms = 0.0;
            }
        }
    }
}

// =============================================================================
// ENEMY STATE
// =============================================================================

/// A live enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    /// Archetype
    pub kind: EnemyKind,
    /// Current health (may go negative on overkill)
    pub health: i32,
    /// Starting health
    pub max_health: i32,
    /// Contact damage after lucidity scaling
    pub damage: u32,
    /// Unscaled movement speed
    pub base_speed: f64,
    /// Movement speed after lucidity scaling
    pub speed: f64,
    /// Spawn position
    pub position: Point,
    /// Slow/stun timers
    pub status: EnemyStatus,
    /// Boss display name
    pub name: Option<String>,
}

impl EnemyState {
    /// Spawn an enemy with unscaled stats.
    pub fn new(kind: EnemyKind, position: Point) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            health: stats.health,
            max_health: stats.health,
            damage: stats.damage,
            base_speed: stats.speed as f64,
            speed: stats.speed as f64,
            position,
            status: EnemyStatus::default(),
            name: None,
        }
    }

    /// Spawn an enemy scaled by the current lucidity modifiers.
    ///
    /// `speed = base * enemy_speed`, `damage = round(damage * enemy_damage)`.
    pub fn spawn(kind: EnemyKind, position: Point, modifiers: &DifficultyModifiers) -> Self {
        let mut enemy = Self::new(kind, position);
        enemy.speed = enemy.base_speed * modifiers.enemy_speed;
        enemy.damage = (enemy.damage as f64 * modifiers.enemy_damage).round() as u32;
        enemy
    }

    /// Attach a boss name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Still standing?
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Subtract damage from health.
    pub fn take_damage(&mut self, damage: u32) {
        let damage = i32::try_from(damage).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(damage);
    }

    /// Speed the movement collaborator should use this frame.
    ///
    /// Zero while stunned, halved while slowed.
    pub fn effective_speed(&self) -> f64 {
        if self.status.stunned {
            0.0
        } else if self.status.slowed {
            self.speed * SLOWED_SPEED_FACTOR
        } else {
            self.speed
        }
    }

    /// Advance status timers by one frame.
    pub fn update_status(&mut self, delta_ms: f64) {
        self.status.update(delta_ms);
    }

    /// Optional visual nudge while stunned.
    ///
    /// Draws from the supplied generator, which should be a cosmetic stream
    /// and not the run's room RNG. Returns the applied offset, if any.
    pub fn stun_jitter(&mut self, rng: &mut DeterministicRng) -> Option<(i32, i32)> {
        if !self.status.stunned || !rng.chance(STUN_JITTER_CHANCE) {
            return None;
        }
        let dx = rng.next_int(-STUN_JITTER_RADIUS, STUN_JITTER_RADIUS);
        let dy = rng.next_int(-STUN_JITTER_RADIUS, STUN_JITTER_RADIUS);
        self.position = self.position.offset(dx, dy);
        Some((dx, dy))
    }
}
