//! Benchmarks for the end-to-end analysis pipeline.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use smash_analysis::synthetic::SmashClip;
use smash_analysis::{AnalysisConfig, KinematicSignals, ReferenceProfile, SmashAnalyzer};
use smash_core::{DominantHand, PoseSequence};

fn benchmark_analyze(c: &mut Criterion) {
    let analyzer = SmashAnalyzer::new(
        AnalysisConfig::default(),
        Arc::new(ReferenceProfile::elite_default()),
    )
    .unwrap();

    let clip_100 = SmashClip::default().request();
    let clip_300 = SmashClip {
        frame_count: 300,
        load_frame: 180.0,
        contact_frame: 213.0,
        ..Default::default()
    }
    .request();

    c.bench_function("analyze_100_frames", |b| {
        b.iter(|| analyzer.analyze(black_box(&clip_100)))
    });

    c.bench_function("analyze_300_frames", |b| {
        b.iter(|| analyzer.analyze(black_box(&clip_300)))
    });
}

fn benchmark_signals(c: &mut Criterion) {
    let clip = SmashClip::default();
    let sequence = PoseSequence::from_pose_frames(&clip.frames(), clip.fps).unwrap();

    c.bench_function("kinematic_signals_100_frames", |b| {
        b.iter(|| KinematicSignals::compute(black_box(&sequence), DominantHand::Right))
    });
}

criterion_group!(benches, benchmark_analyze, benchmark_signals);
criterion_main!(benches);
