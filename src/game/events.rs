//! Run Events
//!
//! Events generated during simulation for replay and verification.

use serde::{Serialize, Deserialize};

use crate::game::amulet::AmuletKind;
use crate::game::enemy::EnemyKind;
use crate::game::room::RoomKind;

/// Handle of a live enemy within an encounter.
pub type EnemyHandle = u32;

/// Handle of a live projectile within an encounter.
pub type ProjectileHandle = u32;

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Run end first
    RunEnd = 0,
    /// Then room transitions
    Room = 1,
    /// Then defeats
    EnemyDefeat = 2,
    /// Then hits
    Combat = 3,
    /// Then pickups
    Pickup = 4,
    /// Lowest priority
    Other = 255,
}

/// Run event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RunEventData {
    /// A room was generated and entered
    RoomLoaded {
        /// 1-based room counter
        room_number: u32,
        /// Template the room was built from
        kind: RoomKind,
        /// Enemies spawned, boss included
        enemy_count: u32,
        /// Amulets placed
        item_count: u32,
    },

    /// Every enemy in the room is gone
    RoomCleared {
        /// Room that was cleared
        room_number: u32,
    },

    /// A projectile hit an enemy
    EnemyHit {
        /// Enemy that was hit
        enemy: EnemyHandle,
        /// Projectile that hit it
        projectile: ProjectileHandle,
        /// Damage dealt
        damage: u32,
        /// Health after the hit (negative on overkill)
        remaining_health: i32,
    },

    /// An enemy went down
    EnemyDefeated {
        /// Enemy that died
        enemy: EnemyHandle,
        /// Its archetype
        kind: EnemyKind,
        /// Lucidity reward
        lucidity_gained: f64,
    },

    /// The player was hit by an enemy
    PlayerHit {
        /// Enemy that made contact
        enemy: EnemyHandle,
        /// Health lost
        damage: u32,
        /// Lucidity lost
        lucidity_lost: f64,
        /// Health after the hit
        remaining_health: u32,
    },

    /// The player picked up an amulet
    AmuletCollected {
        /// Amulet kind
        kind: AmuletKind,
        /// Effect magnitude
        value: u32,
    },

    /// The player died
    RunEnded {
        /// Rooms cleared before death
        rooms_cleared: u32,
        /// Lucidity at death
        final_lucidity: f64,
    },
}

/// A run event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunEvent {
    /// Frame when the event occurred
    pub frame: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Event data
    pub data: RunEventData,
}

impl RunEvent {
    /// Create a new event.
    pub fn new(frame: u32, priority: EventPriority, data: RunEventData) -> Self {
        Self { frame, priority, data }
    }

    /// Create room loaded event.
    pub fn room_loaded(frame: u32, room_number: u32, kind: RoomKind, enemy_count: u32, item_count: u32) -> Self {
        Self::new(
            frame,
            EventPriority::Room,
            RunEventData::RoomLoaded {
                room_number,
                kind,
                enemy_count,
                item_count,
            },
        )
    }

    /// Create room cleared event.
    pub fn room_cleared(frame: u32, room_number: u32) -> Self {
        Self::new(frame, EventPriority::Room, RunEventData::RoomCleared { room_number })
    }

    /// Create enemy hit event.
    pub fn enemy_hit(
        frame: u32,
        enemy: EnemyHandle,
        projectile: ProjectileHandle,
        damage: u32,
        remaining_health: i32,
    ) -> Self {
        Self::new(
            frame,
            EventPriority::Combat,
            RunEventData::EnemyHit {
                enemy,
                projectile,
                damage,
                remaining_health,
            },
        )
    }

    /// Create enemy defeated event.
    pub fn enemy_defeated(frame: u32, enemy: EnemyHandle, kind: EnemyKind, lucidity_gained: f64) -> Self {
        Self::new(
            frame,
            EventPriority::EnemyDefeat,
            RunEventData::EnemyDefeated {
                enemy,
                kind,
                lucidity_gained,
            },
        )
    }

    /// Create player hit event.
    pub fn player_hit(
        frame: u32,
        enemy: EnemyHandle,
        damage: u32,
        lucidity_lost: f64,
        remaining_health: u32,
    ) -> Self {
        Self::new(
            frame,
            EventPriority::Combat,
            RunEventData::PlayerHit {
                enemy,
                damage,
                lucidity_lost,
                remaining_health,
            },
        )
    }

    /// Create amulet collected event.
    pub fn amulet_collected(frame: u32, kind: AmuletKind, value: u32) -> Self {
        Self::new(frame, EventPriority::Pickup, RunEventData::AmuletCollected { kind, value })
    }

    /// Create run ended event.
    pub fn run_ended(frame: u32, rooms_cleared: u32, final_lucidity: f64) -> Self {
        Self::new(
            frame,
            EventPriority::RunEnd,
            RunEventData::RunEnded {
                rooms_cleared,
                final_lucidity,
            },
        )
    }
}

impl PartialEq for RunEvent {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame && self.priority == other.priority
    }
}

impl Eq for RunEvent {}

impl PartialOrd for RunEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RunEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: frame, then priority
        self.frame
            .cmp(&other.frame)
            .then(self.priority.cmp(&other.priority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ordering() {
        let hit = RunEvent::enemy_hit(10, 1, 0, 10, 20);
        let defeat = RunEvent::enemy_defeated(10, 1, EnemyKind::Normal, 5.0);
        let ended = RunEvent::run_ended(10, 3, 12.5);
        let later = RunEvent::room_cleared(11, 1);

        // Same frame: run end < defeat < hit
        assert!(ended < defeat);
        assert!(defeat < hit);

        // Earlier frame always first
        assert!(hit < later);
    }

    #[test]
    fn test_stable_sort_keeps_report_order() {
        let mut events = vec![
            RunEvent::enemy_hit(3, 2, 0, 10, 5),
            RunEvent::enemy_hit(3, 1, 1, 10, 5),
            RunEvent::enemy_defeated(3, 7, EnemyKind::Elite, 7.5),
        ];
        events.sort();

        assert!(matches!(events[0].data, RunEventData::EnemyDefeated { enemy: 7, .. }));
        assert!(matches!(events[1].data, RunEventData::EnemyHit { enemy: 2, .. }));
        assert!(matches!(events[2].data, RunEventData::EnemyHit { enemy: 1, .. }));
    }
}
