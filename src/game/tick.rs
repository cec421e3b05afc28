//! Frame Driver
//!
//! One call per rendered frame. Everything inside a frame runs to completion
//! in a fixed order, so a recorded frame script replays to the same state.

use serde::{Serialize, Deserialize};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::config::RunConfig;
use crate::core::vec2::Vec2;
use crate::game::combat::{resolve, resolve_player_contact, resolve_wall_hit};
use crate::game::encounter::{Encounter, ItemHandle};
use crate::game::events::{EnemyHandle, ProjectileHandle, RunEvent};
use crate::game::projectile::ProjectileFate;
use crate::game::state::RunState;

/// An overlap reported by the physics side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapEvent {
    /// Projectile touched an enemy
    ProjectileEnemy {
        /// Projectile involved
        projectile: ProjectileHandle,
        /// Enemy it touched
        enemy: EnemyHandle,
    },
    /// Projectile touched a wall
    ProjectileWall {
        /// Projectile involved
        projectile: ProjectileHandle,
    },
    /// Enemy touched the player
    PlayerEnemy {
        /// Enemy involved
        enemy: EnemyHandle,
    },
    /// Player walked over an amulet
    PlayerItem {
        /// Amulet handle in the encounter
        item: ItemHandle,
    },
}

/// Input for one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Time since the previous frame
    pub delta_ms: f64,
    /// Fire direction, if the fire button is down
    pub fire: Option<Vec2>,
    /// Overlaps, in the order the physics side reported them
    pub overlaps: Vec<OverlapEvent>,
}

impl FrameInput {
    /// A frame with nothing happening.
    pub fn idle(delta_ms: f64) -> Self {
        Self {
            delta_ms,
            ..Default::default()
        }
    }

    /// Add a fire request.
    pub fn firing(mut self, direction: Vec2) -> Self {
        self.fire = Some(direction);
        self
    }

    /// Add an overlap.
    pub fn with_overlap(mut self, overlap: OverlapEvent) -> Self {
        self.overlaps.push(overlap);
        self
    }
}

/// Result of a frame.
#[derive(Debug, Default)]
pub struct FrameResult {
    /// Events generated this frame, ordered by priority
    pub events: Vec<RunEvent>,
    /// Handle of the projectile fired this frame
    pub fired: Option<ProjectileHandle>,
    /// Enemies removed this frame
    pub defeated: Vec<EnemyHandle>,
    /// The room was cleared this frame
    pub room_cleared: bool,
    /// The run is over
    pub run_ended: bool,
}

/// Generate the next room and instantiate it with the current multipliers.
pub fn enter_room(run: &mut RunState) -> Encounter {
    let room = run.load_room();
    Encounter::instantiate(room, run.room_number, run.lucidity.multipliers())
}

/// Run one frame.
///
/// Order:
/// 1. run clock and lucidity decay
/// 2. shoot cooldown, then the fire request
/// 3. enemy status timers
/// 4. projectile expiry
/// 5. overlaps, in reported order
/// 6. dead enemy removal
/// 7. room-cleared check
/// 8. player death
pub fn step_frame(run: &mut RunState, encounter: &mut Encounter, input: &FrameInput) -> FrameResult {
    let mut result = FrameResult::default();

    if run.is_ended() {
        result.run_ended = true;
        return result;
    }

    // 1. Clock first: multipliers must be current before anything reads them
    run.advance_clock(input.delta_ms);
    let now = run.now_ms();

    // 2. Cooldown, then fire
    run.player.update_cooldown(input.delta_ms);
    if let Some(direction) = input.fire {
        if let Some(projectile) = run.fire_projectile(direction) {
            result.fired = Some(encounter.add_projectile(projectile));
        }
    }

    // 3. Status effects
    encounter.update_statuses(input.delta_ms, &mut run.fx_rng);

    // 4. Expiry
    encounter.expire_projectiles(now);

    // 5. Overlaps
    for overlap in &input.overlaps {
        apply_overlap(run, encounter, *overlap, now);
    }

    // 6. Dead enemies
    result.defeated = encounter.remove_dead_enemies();

    // 7. Room cleared
    if !encounter.cleared && encounter.is_clear() {
        encounter.cleared = true;
        run.room_cleared();
        result.room_cleared = true;
    }

    // 8. Player death
    if !run.player.is_alive() {
        run.end_run();
    }
    result.run_ended = run.is_ended();

    let mut events = run.take_events();
    events.sort();
    result.events = events;

    result
}

/// Route one overlap to the matching resolver path.
///
/// Stale handles (entities already removed) are ignored.
fn apply_overlap(run: &mut RunState, encounter: &mut Encounter, overlap: OverlapEvent, now: u64) {
    #[cfg(feature = "debug-tracing")]
    trace!(frame = run.frame, ?overlap, "overlap");

    match overlap {
        OverlapEvent::ProjectileEnemy { projectile, enemy } => {
            let (Some(shot), Some(target)) = (
                encounter.projectiles.get_mut(&projectile),
                encounter.enemies.get_mut(&enemy),
            ) else {
                return;
            };
            if !target.is_alive() {
                return;
            }

            let outcome = resolve(&run.config.combat, shot, target, &mut run.lucidity, &mut run.stats);
            let kind = target.kind;

            run.push_event(RunEvent::enemy_hit(run.frame, enemy, projectile, outcome.damage, outcome.remaining_health));
            if outcome.enemy_defeated {
                run.push_event(RunEvent::enemy_defeated(run.frame, enemy, kind, outcome.lucidity_gained));
            }
            if outcome.fate == ProjectileFate::Destroyed {
                encounter.projectiles.remove(&projectile);
            }
        }

        OverlapEvent::ProjectileWall { projectile } => {
            let Some(shot) = encounter.projectiles.get_mut(&projectile) else {
                return;
            };
            if resolve_wall_hit(&run.config.combat, shot) == ProjectileFate::Destroyed {
                encounter.projectiles.remove(&projectile);
            }
        }

        OverlapEvent::PlayerEnemy { enemy } => {
            let Some(attacker) = encounter.enemies.get(&enemy) else {
                return;
            };
            let contact = resolve_player_contact(
                &run.config.combat,
                &mut run.player,
                attacker,
                &mut run.lucidity,
                &mut run.stats,
                now,
            );
            if let Some(hit) = contact {
                run.push_event(RunEvent::player_hit(run.frame, enemy, hit.damage, hit.lucidity_lost, hit.remaining_health));
            }
        }

        OverlapEvent::PlayerItem { item } => {
            if let Some(amulet) = encounter.take_item(item) {
                run.collect_amulet(amulet);
            }
        }
    }
}

/// Replay a run from a recorded frame script.
///
/// Starts in the first room and moves to the next one as soon as a room is
/// cleared. Returns the final state and every event, in order.
pub fn replay_run(seed: u32, config: RunConfig, frames: &[FrameInput]) -> (RunState, Vec<RunEvent>) {
    let mut run = RunState::new(seed, config);
    let mut encounter = enter_room(&mut run);
    let mut all_events = Vec::new();

    for frame in frames {
        let result = step_frame(&mut run, &mut encounter, frame);
        all_events.extend(result.events);

        if result.run_ended {
            break;
        }
        if encounter.cleared {
            encounter = enter_room(&mut run);
        }
    }

    all_events.extend(run.take_events());
    (run, all_events)
}
