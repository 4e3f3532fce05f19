//! Benchmarks for MOTUS per-frame pose processing

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use motus_test::{PoseGenerator, PoseGeneratorConfig};
use motus_visual::{compute_angles, diff, Stabilizer, StabilizerConfig};

fn noisy_frames(count: u32) -> Vec<motus_core::LandmarkSet> {
    let mut generator = PoseGenerator::new(PoseGeneratorConfig::noisy(), 0xBEEF);
    (0..count)
        .filter_map(|i| generator.sample(Duration::from_millis(i as u64 * 33)))
        .collect()
}

fn bench_stabilizer_push(c: &mut Criterion) {
    let frames = noisy_frames(256);
    let mut group = c.benchmark_group("stabilizer_push");

    for window in [1usize, 5, 15] {
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &window| {
            let mut stabilizer = Stabilizer::with_config(StabilizerConfig::with_window_size(window));
            let mut i = 0usize;
            b.iter(|| {
                i = (i + 1) % frames.len();
                black_box(stabilizer.push(Some(&frames[i])))
            })
        });
    }
    group.finish();
}

fn bench_compute_angles(c: &mut Criterion) {
    let frames = noisy_frames(64);

    c.bench_function("compute_angles", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % frames.len();
            black_box(compute_angles(Some(&frames[i])))
        })
    });
}

fn bench_angle_diff(c: &mut Criterion) {
    let frames = noisy_frames(2);
    let live = compute_angles(frames.first());
    let reference = compute_angles(frames.last());

    c.bench_function("angle_diff", |b| {
        b.iter(|| black_box(diff(black_box(live.as_ref()), black_box(reference.as_ref()))))
    });
}

criterion_group!(
    benches,
    bench_stabilizer_push,
    bench_compute_angles,
    bench_angle_diff
);
criterion_main!(benches);
