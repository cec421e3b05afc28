//! Live Encounter
//!
//! The instantiated room: live enemies, projectiles in flight and loose
//! amulets, keyed by handle in BTreeMaps so every pass iterates in the same
//! order.

use std::collections::BTreeMap;

use crate::core::rng::DeterministicRng;
use crate::game::amulet::AmuletDefinition;
use crate::game::enemy::{EnemyKind, EnemyState};
use crate::game::events::{EnemyHandle, ProjectileHandle};
use crate::game::lucidity::DifficultyModifiers;
use crate::game::projectile::ProjectileState;
use crate::game::room::{ItemPlacement, RoomDescriptor, RoomKind, RoomLayout};

/// Handle of a loose amulet within an encounter.
pub type ItemHandle = u32;

/// One room's worth of live entities.
#[derive(Clone, Debug)]
pub struct Encounter {
    /// Room number this encounter belongs to
    pub room_number: u32,

    /// Room type
    pub kind: RoomKind,

    /// Geometry, kept for the physics side
    pub layout: RoomLayout,

    /// Live enemies (BTreeMap for deterministic iteration)
    pub enemies: BTreeMap<EnemyHandle, EnemyState>,

    /// Projectiles in flight
    pub projectiles: BTreeMap<ProjectileHandle, ProjectileState>,

    /// Amulets on the floor
    pub items: BTreeMap<ItemHandle, ItemPlacement>,

    /// Room-cleared already reported
    pub cleared: bool,

    next_projectile: ProjectileHandle,
}

impl Encounter {
    /// Instantiate a generated room.
    ///
    /// Enemy stats are scaled by the multipliers current at spawn time.
    /// Handles follow descriptor order; the boss comes last.
    pub fn instantiate(room: RoomDescriptor, room_number: u32, modifiers: &DifficultyModifiers) -> Self {
        let RoomDescriptor { kind, layout, enemies: placements, items: loot, boss } = room;

        let mut enemies = BTreeMap::new();
        for placement in &placements {
            let handle = enemies.len() as EnemyHandle;
            enemies.insert(handle, EnemyState::spawn(placement.kind, placement.position, modifiers));
        }
        if let Some(boss) = boss {
            let handle = enemies.len() as EnemyHandle;
            let enemy = EnemyState::spawn(EnemyKind::Boss, boss.position, modifiers).with_name(boss.name);
            enemies.insert(handle, enemy);
        }

        let items = loot
            .into_iter()
            .enumerate()
            .map(|(i, item)| (i as ItemHandle, item))
            .collect();

        Self {
            room_number,
            kind,
            layout,
            enemies,
            projectiles: BTreeMap::new(),
            items,
            cleared: false,
            next_projectile: 0,
        }
    }

    /// Put a projectile in flight.
    pub fn add_projectile(&mut self, projectile: ProjectileState) -> ProjectileHandle {
        let handle = self.next_projectile;
        self.next_projectile = self.next_projectile.wrapping_add(1);
        self.projectiles.insert(handle, projectile);
        handle
    }

    /// Pick up an amulet from the floor.
    pub fn take_item(&mut self, handle: ItemHandle) -> Option<AmuletDefinition> {
        self.items.remove(&handle).map(|item| item.amulet)
    }

    /// Count status timers down and apply stun jitter from the cosmetic stream.
    pub fn update_statuses(&mut self, delta_ms: f64, fx_rng: &mut DeterministicRng) {
        for enemy in self.enemies.values_mut() {
            enemy.update_status(delta_ms);
            enemy.stun_jitter(fx_rng);
        }
    }

    /// Drop projectiles past their lifespan. Returns how many.
    pub fn expire_projectiles(&mut self, now_ms: u64) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|_, p| !p.is_expired(now_ms));
        before - self.projectiles.len()
    }

    /// Remove dead enemies, returning their handles in order.
    pub fn remove_dead_enemies(&mut self) -> Vec<EnemyHandle> {
        let dead: Vec<EnemyHandle> = self
            .enemies
            .iter()
            .filter(|(_, e)| !e.is_alive())
            .map(|(handle, _)| *handle)
            .collect();
        for handle in &dead {
            self.enemies.remove(handle);
        }
        dead
    }

    /// Every enemy is gone.
    #[inline]
    pub fn is_clear(&self) -> bool {
        self.enemies.is_empty()
    }
}
