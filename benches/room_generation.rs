//! Criterion benchmarks for room generation and frame stepping.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dreamer::core::rng::DeterministicRng;
use dreamer::game::room::{RoomGenerator, RoomKind};
use dreamer::game::state::RunState;
use dreamer::game::tick::{enter_room, step_frame, FrameInput, OverlapEvent};
use dreamer::core::vec2::Vec2;

/// Benchmark: generate one room of each kind from a fresh seed.
fn bench_generate_rooms(c: &mut Criterion) {
    let generator = RoomGenerator::default();

    c.bench_function("generate_room_each_kind", |b| {
        let mut seed = 0u32;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut rng = DeterministicRng::new(seed);
            for kind in [RoomKind::Normal, RoomKind::Elite, RoomKind::Boss] {
                black_box(generator.generate(&mut rng, kind));
            }
        });
    });
}

/// Benchmark: the pacing loop over the first 100 rooms of a run.
fn bench_hundred_rooms(c: &mut Criterion) {
    c.bench_function("load_100_rooms", |b| {
        b.iter(|| {
            let mut run = RunState::with_seed(black_box(12345));
            for _ in 0..100 {
                black_box(run.load_room());
            }
        });
    });
}

/// Benchmark: 600 frames (10 seconds at 60 Hz) of firing and contact.
fn bench_step_frames(c: &mut Criterion) {
    let frames: Vec<FrameInput> = (0..600u32)
        .map(|i| {
            FrameInput::idle(16.0)
                .firing(Vec2::new(1.0, 0.5))
                .with_overlap(OverlapEvent::ProjectileEnemy { projectile: i / 20, enemy: i % 3 })
                .with_overlap(OverlapEvent::PlayerEnemy { enemy: 0 })
        })
        .collect();

    c.bench_function("step_600_frames", |b| {
        b.iter(|| {
            let mut run = RunState::with_seed(777);
            let mut encounter = enter_room(&mut run);
            for frame in &frames {
                black_box(step_frame(&mut run, &mut encounter, frame));
            }
        });
    });
}

criterion_group!(benches, bench_generate_rooms, bench_hundred_rooms, bench_step_frames);
criterion_main!(benches);
