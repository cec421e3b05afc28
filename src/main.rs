//! Dreamer Simulation Driver
//!
//! Runs a scripted demo run from a seed and verifies that replaying the
//! recorded frames reproduces the same final state hash.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dreamer::{
    FRAME_RATE, VERSION,
    config::RunConfig,
    core::vec2::Vec2,
    game::{
        encounter::Encounter,
        events::RunEventData,
        state::RunState,
        tick::{enter_room, replay_run, step_frame, FrameInput, OverlapEvent},
    },
};

/// Demo stops after three minutes of frames even if the player survives.
const MAX_DEMO_FRAMES: u32 = FRAME_RATE * 180;

/// Frames between scripted enemy contacts.
const CONTACT_EVERY: u32 = 40;

/// Frames between scripted amulet pickups.
const PICKUP_EVERY: u32 = 90;

#[derive(Parser, Debug)]
#[command(name = "dreamer-sim", version)]
#[command(about = "Run a scripted dreamer run and verify it replays to the same hash")]
struct Args {
    /// Run seed; derived from the clock when omitted
    #[arg(long, env = "DREAMER_SEED")]
    seed: Option<u32>,

    /// JSON tuning file; built-in defaults when omitted
    #[arg(long, env = "DREAMER_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Dreamer Sim v{}", VERSION);

    let seed = args.seed.unwrap_or_else(clock_seed);
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            RunConfig::load(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => RunConfig::default(),
    };

    demo_run(seed, config);
    Ok(())
}

/// Low 32 bits of the Unix time in milliseconds.
fn clock_seed() -> u32 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    millis as u32
}

/// Scripted input for one frame: always fire right, hit the first enemy with
/// the oldest projectile, and touch an enemy or an amulet now and then.
fn scripted_input(frame: u32, encounter: &Encounter, delta_ms: f64) -> FrameInput {
    let mut input = FrameInput::idle(delta_ms).firing(Vec2::RIGHT);

    let first_enemy = encounter.enemies.keys().next().copied();
    let oldest_projectile = encounter.projectiles.keys().next().copied();

    if let (Some(projectile), Some(enemy)) = (oldest_projectile, first_enemy) {
        input = input.with_overlap(OverlapEvent::ProjectileEnemy { projectile, enemy });
    }
    if let Some(enemy) = first_enemy {
        if frame % CONTACT_EVERY == 0 {
            input = input.with_overlap(OverlapEvent::PlayerEnemy { enemy });
        }
    }
    if frame % PICKUP_EVERY == 0 {
        if let Some(item) = encounter.items.keys().next().copied() {
            input = input.with_overlap(OverlapEvent::PlayerItem { item });
        }
    }

    input
}

/// Demo function to exercise the simulation.
fn demo_run(seed: u32, config: RunConfig) {
    info!("=== Starting Demo Run ===");
    info!("Seed: {}", seed);

    let delta_ms = 1000.0 / FRAME_RATE as f64;
    let mut run = RunState::new(seed, config.clone());
    let mut encounter = enter_room(&mut run);
    let mut recorded: Vec<FrameInput> = Vec::new();
    let mut total_events = 0;

    for frame in 1..=MAX_DEMO_FRAMES {
        let input = scripted_input(frame, &encounter, delta_ms);
        let result = step_frame(&mut run, &mut encounter, &input);
        recorded.push(input);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                RunEventData::RoomLoaded { room_number, kind, enemy_count, .. } => {
                    info!("Room {} ({}) with {} enemies", room_number, kind, enemy_count);
                }
                RunEventData::EnemyDefeated { kind, lucidity_gained, .. } => {
                    info!("Defeated {} (+{:.1} lucidity)", kind, lucidity_gained);
                }
                RunEventData::AmuletCollected { kind, value } => {
                    info!("Collected {} amulet ({})", kind, value);
                }
                _ => {}
            }
        }

        if frame % (FRAME_RATE * 10) == 0 {
            info!(
                "Frame {}: room {}, lucidity {:.1} ({}), health {}",
                frame,
                run.room_number,
                run.lucidity.lucidity(),
                run.lucidity.band(),
                run.player.health
            );
        }

        if result.run_ended {
            info!("Run ended at frame {}", frame);
            break;
        }
        if encounter.cleared {
            encounter = enter_room(&mut run);
        }
    }
    total_events += run.take_events().len();

    // Print final results
    info!("=== Run Results ===");
    let hash = run.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    let stats = run.stats_snapshot();
    info!("Rooms cleared: {}", stats.rooms_cleared);
    info!("Enemies defeated: {}", stats.enemies_defeated);
    info!("Amulets: {}", stats.amulet_count);
    info!("Damage dealt/received: {}/{}", stats.total_damage_dealt, stats.total_damage_received);
    info!("Final lucidity: {:.2}", stats.final_lucidity);
    info!("Total events: {}", total_events);

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay_run(seed, config, &recorded);
    let replay_hash = replayed.compute_hash();

    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }
}
