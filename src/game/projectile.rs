//! Projectiles
//!
//! Fired "thoughts". Amulet bonuses are folded in once, at creation; after
//! that a projectile only loses pierce/ricochet charges until it dies.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::amulet::{AmuletDefinition, ProjectileModifiers};

/// Damage of a projectile with no damage amulets.
pub const BASE_PROJECTILE_DAMAGE: u32 = 10;

/// Launch speed (units per second).
pub const PROJECTILE_SPEED: f64 = 400.0;

/// Time to live.
pub const PROJECTILE_LIFESPAN_MS: u64 = 10_000;

/// Speed kept after each ricochet.
pub const RICOCHET_SPEED_RETENTION: f64 = 0.8;

/// What happened to a projectile after an interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileFate {
    /// Kept flying unchanged (no interaction, or a pierce charge was spent)
    Survives,
    /// Bounced; velocity reflected and slowed
    Ricocheted,
    /// Gone
    Destroyed,
}

impl ProjectileFate {
    /// Whether the projectile is still in play.
    pub fn is_alive(self) -> bool {
        !matches!(self, ProjectileFate::Destroyed)
    }
}

/// A live projectile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileState {
    /// Damage before amulets
    pub base_damage: u32,
    /// Damage from amulets, fixed at creation
    pub bonus_damage: u32,
    /// Enemy hits it can still pass through
    pub pierce_remaining: u32,
    /// Bounces left
    pub ricochet_remaining: u32,
    /// Applies slow on hit
    pub slow: bool,
    /// Applies stun on hit
    pub stun: bool,
    /// Velocity (units per second)
    pub velocity: Vec2,
    /// Run clock at creation
    pub created_at_ms: u64,
    /// Time to live
    pub lifespan_ms: u64,
}

impl ProjectileState {
    /// Create a projectile with explicit modifiers.
    pub fn new(velocity: Vec2, modifiers: ProjectileModifiers, created_at_ms: u64) -> Self {
        Self {
            base_damage: BASE_PROJECTILE_DAMAGE,
            bonus_damage: modifiers.bonus_damage,
            pierce_remaining: modifiers.pierce,
            ricochet_remaining: modifiers.ricochet,
            slow: modifiers.slow,
            stun: modifiers.stun,
            velocity,
            created_at_ms,
            lifespan_ms: PROJECTILE_LIFESPAN_MS,
        }
    }

    /// Fire along a direction, folding every amulet in the shooter's inventory.
    ///
    /// The direction is normalized; a zero or non-finite direction yields a
    /// stationary projectile rather than NaN velocity.
    pub fn fire(
        direction: Vec2,
        speed: f64,
        inventory: &[AmuletDefinition],
        created_at_ms: u64,
    ) -> Self {
        let modifiers = ProjectileModifiers::from_inventory(inventory);
        Self::new(direction.normalize().scale(speed), modifiers, created_at_ms)
    }

    /// Override base damage (config hook).
    pub fn with_base_damage(mut self, base_damage: u32) -> Self {
        self.base_damage = base_damage;
        self
    }

    /// Override lifespan (config hook).
    pub fn with_lifespan(mut self, lifespan_ms: u64) -> Self {
        self.lifespan_ms = lifespan_ms;
        self
    }

    /// Damage dealt per hit.
    #[inline]
    pub fn damage(&self) -> u32 {
        self.base_damage.saturating_add(self.bonus_damage)
    }

    /// Lived past its lifespan?
    #[inline]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) > self.lifespan_ms
    }

    /// Spend one ricochet charge: reflect the dominant axis and slow down.
    ///
    /// Returns `Destroyed` if no charges are left.
    pub fn ricochet(&mut self, retention: f64) -> ProjectileFate {
        if self.ricochet_remaining == 0 {
            return ProjectileFate::Destroyed;
        }
        self.ricochet_remaining -= 1;
        self.velocity = self.velocity.reflect_dominant(retention);
        ProjectileFate::Ricocheted
    }

    /// Fate after hitting an enemy: pierce, else ricochet, else destroy.
    pub fn after_enemy_hit(&mut self, retention: f64) -> ProjectileFate {
        if self.pierce_remaining > 0 {
            self.pierce_remaining -= 1;
            return ProjectileFate::Survives;
        }
        self.ricochet(retention)
    }

    /// Fate after hitting a wall: ricochet, else destroy.
    pub fn after_wall_hit(&mut self, retention: f64) -> ProjectileFate {
        self.ricochet(retention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::amulet::AmuletKind;

    fn plain() -> ProjectileState {
        ProjectileState::new(Vec2::new(400.0, 0.0), ProjectileModifiers::default(), 0)
    }

    #[test]
    fn test_fire_folds_inventory() {
        let inventory = [AmuletDefinition::for_kind(AmuletKind::Damage)];
        let projectile = ProjectileState::fire(Vec2::new(0.0, -2.0), PROJECTILE_SPEED, &inventory, 500);
        assert_eq!(projectile.base_damage, 10);
        assert_eq!(projectile.bonus_damage, 5);
        assert_eq!(projectile.damage(), 15);
        assert_eq!(projectile.velocity, Vec2::new(0.0, -400.0));
        assert_eq!(projectile.created_at_ms, 500);
    }

    #[test]
    fn test_fire_zero_direction() {
        let projectile = ProjectileState::fire(Vec2::ZERO, PROJECTILE_SPEED, &[], 0);
        assert_eq!(projectile.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_expiry() {
        let projectile = plain();
        assert!(!projectile.is_expired(10_000));
        assert!(projectile.is_expired(10_001));
    }

    #[test]
    fn test_plain_projectile_destroyed_on_hit() {
        let mut projectile = plain();
        assert_eq!(projectile.after_enemy_hit(RICOCHET_SPEED_RETENTION), ProjectileFate::Destroyed);
    }

    #[test]
    fn test_pierce_before_ricochet() {
        let mods = ProjectileModifiers { pierce: 1, ricochet: 1, ..Default::default() };
        let mut projectile = ProjectileState::new(Vec2::new(400.0, 100.0), mods, 0);

        assert_eq!(projectile.after_enemy_hit(0.8), ProjectileFate::Survives);
        assert_eq!(projectile.velocity, Vec2::new(400.0, 100.0));

        assert_eq!(projectile.after_enemy_hit(0.8), ProjectileFate::Ricocheted);
        assert_eq!(projectile.velocity, Vec2::new(-320.0, 80.0));

        assert_eq!(projectile.after_enemy_hit(0.8), ProjectileFate::Destroyed);
    }

    #[test]
    fn test_wall_hit_without_ricochet() {
        let mods = ProjectileModifiers { pierce: 3, ..Default::default() };
        let mut projectile = ProjectileState::new(Vec2::new(0.0, 400.0), mods, 0);
        assert_eq!(projectile.after_wall_hit(0.8), ProjectileFate::Destroyed);
        assert_eq!(projectile.pierce_remaining, 3);
    }

    #[test]
    fn test_wall_bounces() {
        let mods = ProjectileModifiers { ricochet: 2, ..Default::default() };
        let mut projectile = ProjectileState::new(Vec2::new(0.0, 400.0), mods, 0);
        assert_eq!(projectile.after_wall_hit(0.8), ProjectileFate::Ricocheted);
        assert_eq!(projectile.velocity, Vec2::new(0.0, -320.0));
        assert_eq!(projectile.after_wall_hit(0.8), ProjectileFate::Ricocheted);
        assert_eq!(projectile.ricochet_remaining, 0);
        assert_eq!(projectile.after_wall_hit(0.8), ProjectileFate::Destroyed);
    }
}
