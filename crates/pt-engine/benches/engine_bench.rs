//! Render throughput for a fully populated project.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pt_engine::{Engine, EngineConfig, NullSink};
use pt_ir::{Instrument, Note, Pattern, Project, SampleBuffer, MAX_TRACKS};
use std::sync::Arc;

const SAMPLE_RATE: u32 = 48000;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn busy_project(tracks: usize) -> Arc<Project> {
    let mut project = Project::new("bench");
    project.track_count = tracks;

    let data: Vec<f32> = (0..SAMPLE_RATE as usize / 4)
        .map(|i| (i as f32 * 0.05).sin())
        .collect();
    project.add_instrument(Instrument::new(1, SampleBuffer::mono(data, SAMPLE_RATE)).looped(true));

    let mut pattern = Pattern::new(0, 16, "");
    for row in 0..16 {
        pattern.set_note(row, Some(Note::new(48 + row as u8, Some(1), 0.5)));
    }
    project.add_pattern(pattern);
    project.push_song_row(&vec![Some(0); tracks]);
    Arc::new(project)
}

fn bench_render_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_block");

    for &tracks in &[8, MAX_TRACKS] {
        for &size in BLOCK_SIZES {
            group.throughput(Throughput::Elements(size as u64));

            let mut engine = Engine::with_project(EngineConfig::new(SAMPLE_RATE), busy_project(tracks));
            engine.play(&mut NullSink);
            let mut left = vec![0.0f32; size];
            let mut right = vec![0.0f32; size];

            group.bench_with_input(
                BenchmarkId::new(format!("{tracks}_tracks"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        left.fill(0.0);
                        right.fill(0.0);
                        engine.render_block(&mut left, &mut right, &mut NullSink);
                        black_box((&left, &right));
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_render_block);
criterion_main!(benches);
