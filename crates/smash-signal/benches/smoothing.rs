//! Benchmarks for trajectory preprocessing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use smash_core::{Joint, Keypoint, PoseSequence, SkeletalFrame};
use smash_signal::filtering::SavitzkyGolayFilter;
use smash_signal::preprocess::{SmoothingConfig, TrajectoryPreprocessor};

fn create_test_sequence(n_frames: u64) -> PoseSequence {
    let frames = (0..n_frames)
        .map(|n| {
            let t = n as f64 * 0.05;
            Joint::ALL.iter().fold(SkeletalFrame::new(n), |frame, &joint| {
                let offset = joint.index() as f64 * 20.0;
                let jitter = if n % 3 == 0 { 1.5 } else { -0.5 };
                let vis = if n % 17 == 0 { 0.2 } else { 0.95 };
                frame.with(
                    joint,
                    Keypoint::new(300.0 + offset + 40.0 * t.sin() + jitter, 200.0 + offset + jitter, vis),
                )
            })
        })
        .collect();
    PoseSequence::new(frames, 30.0).expect("valid sequence")
}

fn benchmark_filter(c: &mut Criterion) {
    let filter = SavitzkyGolayFilter::new(7, 2).unwrap();
    let data: Vec<f64> = (0..1000)
        .map(|i| (i as f64 * 0.01).sin() + if i % 2 == 0 { 0.05 } else { -0.05 })
        .collect();

    c.bench_function("savitzky_golay_1000", |b| {
        b.iter(|| filter.filter_signal(black_box(&data)))
    });
}

fn benchmark_preprocess(c: &mut Criterion) {
    let pre = TrajectoryPreprocessor::new(SmoothingConfig::default(), 0.5).unwrap();

    let clip_3s = create_test_sequence(90);
    let clip_10s = create_test_sequence(300);

    c.bench_function("smooth_90_frames", |b| b.iter(|| pre.smooth(black_box(&clip_3s))));

    c.bench_function("smooth_300_frames", |b| b.iter(|| pre.smooth(black_box(&clip_10s))));
}

criterion_group!(benches, benchmark_filter, benchmark_preprocess);
criterion_main!(benches);
