//! Player State
//!
//! Health, amulet inventory and the shoot cooldown. Movement itself belongs
//! to the physics collaborator.

use serde::{Serialize, Deserialize};

use crate::core::time::sanitize_delta;
use crate::core::vec2::Vec2;
use crate::game::amulet::{AmuletDefinition, AmuletKind};
use crate::game::projectile::{ProjectileState, PROJECTILE_LIFESPAN_MS, PROJECTILE_SPEED, BASE_PROJECTILE_DAMAGE};

/// Tuning for the player and their projectiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Maximum (and starting) health
    pub max_health: u32,
    /// Movement speed
    pub speed: f64,
    /// Minimum time between shots
    pub shoot_interval_ms: f64,
    /// Projectile launch speed
    pub projectile_speed: f64,
    /// Projectile damage before amulets
    pub projectile_base_damage: u32,
    /// Projectile time to live
    pub projectile_lifespan_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            speed: 200.0,
            shoot_interval_ms: 300.0,
            projectile_speed: PROJECTILE_SPEED,
            projectile_base_damage: BASE_PROJECTILE_DAMAGE,
            projectile_lifespan_ms: PROJECTILE_LIFESPAN_MS,
        }
    }
}

/// The dreamer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current health
    pub health: u32,
    /// Health cap
    pub max_health: u32,
    /// Movement speed (raised by speed amulets)
    pub speed: f64,
    /// Collected amulets, in pickup order
    pub inventory: Vec<AmuletDefinition>,
    /// Time until the next shot is allowed
    pub shoot_cooldown_ms: f64,
    /// Run clock of the last contact hit taken
    pub last_contact_ms: Option<u64>,
}

impl PlayerState {
    /// Fresh player.
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            health: config.max_health,
            max_health: config.max_health,
            speed: config.speed,
            inventory: Vec::new(),
            shoot_cooldown_ms: 0.0,
            last_contact_ms: None,
        }
    }

    /// Still alive?
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Take damage, flooring at zero.
    pub fn take_damage(&mut self, damage: u32) {
        self.health = self.health.saturating_sub(damage);
    }

    /// Add an amulet and apply its immediate effect.
    ///
    /// Health heals (capped), speed adds to movement speed; projectile
    /// amulets only matter at fire time.
    pub fn collect_amulet(&mut self, amulet: AmuletDefinition) {
        self.inventory.push(amulet);

        match amulet.kind {
            AmuletKind::Health => {
                self.health = self.health.saturating_add(amulet.value).min(self.max_health);
            }
            AmuletKind::Speed => {
                self.speed += amulet.value as f64;
            }
            AmuletKind::Damage
            | AmuletKind::Ricochet
            | AmuletKind::Slow
            | AmuletKind::Stun
            | AmuletKind::Pierce => {}
        }
    }

    /// Count the shoot cooldown down.
    pub fn update_cooldown(&mut self, delta_ms: f64) {
        if self.shoot_cooldown_ms > 0.0 {
            self.shoot_cooldown_ms -= sanitize_delta(delta_ms);
        }
    }

    /// Can shoot now?
    #[inline]
    pub fn can_shoot(&self) -> bool {
        self.shoot_cooldown_ms <= 0.0
    }

    /// Fire a projectile if off cooldown and the direction is non-zero.
    pub fn shoot(&mut self, direction: Vec2, config: &PlayerConfig, now_ms: u64) -> Option<ProjectileState> {
        if !self.can_shoot() || !direction.is_finite() || !direction.is_nonzero() {
            return None;
        }
        self.shoot_cooldown_ms = config.shoot_interval_ms;

        let projectile = ProjectileState::fire(direction, config.projectile_speed, &self.inventory, now_ms)
            .with_base_damage(config.projectile_base_damage)
            .with_lifespan(config.projectile_lifespan_ms);
        Some(projectile)
    }
}
