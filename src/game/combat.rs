//! Combat Resolution
//!
//! Turns overlap reports from the physics side into damage, status effects,
//! projectile fate and lucidity changes. Everything is passed in by `&mut`;
//! the resolver holds no state of its own.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::game::enemy::EnemyState;
use crate::game::lucidity::LucidityController;
use crate::game::player::PlayerState;
use crate::game::projectile::{ProjectileFate, ProjectileState, RICOCHET_SPEED_RETENTION};
use crate::game::state::RunStats;

/// Combat tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Slow duration applied by slow projectiles
    pub slow_duration_ms: f64,
    /// Stun duration applied by stun projectiles
    pub stun_duration_ms: f64,
    /// Speed kept per ricochet
    pub ricochet_speed_retention: f64,
    /// Contact damage window; hits closer together than this are ignored
    pub contact_cooldown_ms: u64,
    /// Lucidity lost per contact hit
    pub contact_lucidity_loss: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            slow_duration_ms: 2000.0,
            stun_duration_ms: 1500.0,
            ricochet_speed_retention: RICOCHET_SPEED_RETENTION,
            contact_cooldown_ms: 500,
            contact_lucidity_loss: 3.0,
        }
    }
}

/// Result of a projectile hitting an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Damage dealt
    pub damage: u32,
    /// Enemy health after the hit
    pub remaining_health: i32,
    /// This hit took the enemy from alive to dead
    pub enemy_defeated: bool,
    /// Lucidity recovered from the defeat
    pub lucidity_gained: f64,
    /// What happened to the projectile
    pub fate: ProjectileFate,
}

/// Result of an enemy touching the player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactOutcome {
    /// Damage taken
    pub damage: u32,
    /// Lucidity lost
    pub lucidity_lost: f64,
    /// Player health after the hit
    pub remaining_health: u32,
}

/// Resolve a projectile hitting an enemy.
///
/// Order: damage, status effects, defeat bookkeeping, projectile fate.
/// A defeat is counted only on the hit that takes health from above zero to
/// zero or below.
pub fn resolve(
    config: &CombatConfig,
    projectile: &mut ProjectileState,
    enemy: &mut EnemyState,
    lucidity: &mut LucidityController,
    stats: &mut RunStats,
) -> CombatOutcome {
    let damage = projectile.damage();
    let was_alive = enemy.is_alive();

    enemy.take_damage(damage);
    stats.total_damage_dealt = stats.total_damage_dealt.saturating_add(u64::from(damage));

    if projectile.slow {
        enemy.status.apply_slow(config.slow_duration_ms);
    }
    if projectile.stun {
        enemy.status.apply_stun(config.stun_duration_ms);
    }

    let enemy_defeated = was_alive && !enemy.is_alive();
    let lucidity_gained = if enemy_defeated {
        stats.enemies_defeated += 1;
        lucidity.gain_lucidity(enemy.kind)
    } else {
        0.0
    };

    let fate = projectile.after_enemy_hit(config.ricochet_speed_retention);

    debug!(
        kind = %enemy.kind,
        damage,
        health = enemy.health,
        defeated = enemy_defeated,
        ?fate,
        "projectile hit"
    );

    CombatOutcome {
        damage,
        remaining_health: enemy.health,
        enemy_defeated,
        lucidity_gained,
        fate,
    }
}

/// Resolve a projectile hitting a wall: bounce if it can, else destroy.
pub fn resolve_wall_hit(config: &CombatConfig, projectile: &mut ProjectileState) -> ProjectileFate {
    projectile.after_wall_hit(config.ricochet_speed_retention)
}

/// Resolve an enemy touching the player.
///
/// Applies at most once per contact window on the run clock. Returns `None`
/// when the window has not elapsed or either side is already dead.
pub fn resolve_player_contact(
    config: &CombatConfig,
    player: &mut PlayerState,
    enemy: &EnemyState,
    lucidity: &mut LucidityController,
    stats: &mut RunStats,
    now_ms: u64,
) -> Option<ContactOutcome> {
    if !player.is_alive() || !enemy.is_alive() {
        return None;
    }

    if let Some(last) = player.last_contact_ms {
        if now_ms.saturating_sub(last) <= config.contact_cooldown_ms {
            return None;
        }
    }

    player.take_damage(enemy.damage);
    player.last_contact_ms = Some(now_ms);
    let lucidity_lost = lucidity.lose_lucidity(config.contact_lucidity_loss);
    stats.total_damage_received = stats.total_damage_received.saturating_add(u64::from(enemy.damage));

    debug!(
        kind = %enemy.kind,
        damage = enemy.damage,
        health = player.health,
        "player hit"
    );

    Some(ContactOutcome {
        damage: enemy.damage,
        lucidity_lost,
        remaining_health: player.health,
    })
}
