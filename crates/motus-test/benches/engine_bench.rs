//! Benchmarks for the MOTUS engine frame loop

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use motus_core::MotionTime;
use motus_runtime::{EngineConfig, MotionEngine, Recording};
use motus_test::{PoseGenerator, PoseGeneratorConfig};
use motus_time::{ManualClock, PlaybackSynchronizer};

fn recording(frames: u32) -> Recording {
    let generator = PoseGenerator::new(PoseGeneratorConfig::default(), 1);
    let poses = (0..frames)
        .map(|i| generator.clean_pose(Duration::from_millis(i as u64 * 33)))
        .collect();
    Recording::from_frames(poses, 30)
}

fn bench_engine_tick_comparing(c: &mut Criterion) {
    let clock = ManualClock::new();
    let mut engine = MotionEngine::with_clock(EngineConfig::default(), clock.clone());
    engine.load_recording(recording(120));
    engine.start_camera();
    engine.start_comparison().ok();

    let mut generator = PoseGenerator::new(PoseGeneratorConfig::noisy(), 2);

    c.bench_function("engine_tick_comparing", |b| {
        b.iter(|| {
            let t = clock.advance(Duration::from_micros(16_667));
            let raw = generator.sample(Duration::from_micros(t.as_micros()));
            black_box(engine.tick(raw.as_ref()))
        })
    });
}

fn bench_sync_advance(c: &mut Criterion) {
    let mut sync = PlaybackSynchronizer::new();
    sync.start(120, true, MotionTime::ZERO).ok();

    c.bench_function("sync_advance", |b| {
        let mut now = 0u64;
        b.iter(|| {
            now += 16_667;
            black_box(sync.advance(MotionTime::from_micros(now), 120))
        })
    });
}

fn bench_recording_export_import(c: &mut Criterion) {
    let rec = recording(120);

    c.bench_function("recording_export_import", |b| {
        b.iter(|| {
            let json = rec.export_json().unwrap();
            black_box(Recording::import_json(&json).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_engine_tick_comparing,
    bench_sync_advance,
    bench_recording_export_import
);
criterion_main!(benches);
