//! Performance benchmarks for splice rendering
//!
//! Measures:
//! - Fade gain calculation
//! - Crossfade synthesis throughput per blend style
//! - Beatmatch time stretching throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use djmix_common::fade_curves::{linear_gain, linear_ramp};
use djmix_common::{AudioFormat, FadeDirection};
use djmix_engine::crossfade::{synthesize, SpliceWindow};
use djmix_engine::stretch::{TimeStretch, BeatmatchStretcher};
use djmix_engine::{AudioBuffer, BlendStyle};

const FORMAT: AudioFormat = AudioFormat::STANDARD;

fn tone(frames: usize, frequency: f32) -> AudioBuffer {
    let rate = FORMAT.sample_rate as f32;
    let samples = (0..frames)
        .flat_map(|i| {
            let s = (2.0 * std::f32::consts::PI * frequency * i as f32 / rate).sin() * 0.5;
            [s, s]
        })
        .collect();
    AudioBuffer::new(samples, FORMAT)
}

/// Benchmark fade gain calculations
fn bench_fade_gains(c: &mut Criterion) {
    let mut group = c.benchmark_group("fade_gains");

    for (name, direction) in [("fade_in", FadeDirection::In), ("fade_out", FadeDirection::Out)] {
        group.bench_function(BenchmarkId::new("gain", name), |b| {
            b.iter(|| {
                for i in 0..1024 {
                    black_box(linear_gain(direction, black_box(i), 1024));
                }
            })
        });

        group.bench_function(BenchmarkId::new("ramp_1s", name), |b| {
            b.iter(|| black_box(linear_ramp(direction, 44100)))
        });
    }

    group.finish();
}

/// Benchmark crossfade synthesis over fades of different lengths
fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossfade_synthesis");

    let fades = [("1s", 44100), ("8s", 8 * 44100), ("30s", 30 * 44100)];
    let a = tone(60 * 44100, 220.0);
    let b = tone(60 * 44100, 330.0);

    for (name, fade_frames) in fades {
        group.throughput(Throughput::Elements(fade_frames as u64));
        let window = SpliceWindow {
            fade_start: 20 * 44100,
            fade_frames,
            mixin: 5 * 44100,
        };

        for style in [BlendStyle::Classic, BlendStyle::BassSwap] {
            group.bench_function(BenchmarkId::new(style.as_str(), name), |bench| {
                bench.iter_batched(
                    || a.clone(),
                    |a| black_box(synthesize(style, a, &b, window)),
                    criterion::BatchSize::LargeInput,
                )
            });
        }
    }

    group.finish();
}

/// Benchmark tempo matching on one channel
fn bench_stretch(c: &mut Criterion) {
    let mut group = c.benchmark_group("beatmatch_stretch");
    group.sample_size(10);

    let channel = tone(10 * 44100, 220.0).to_planar().remove(0);
    group.throughput(Throughput::Elements(channel.len() as u64));

    for rate in [0.9375, 1.0667] {
        group.bench_with_input(BenchmarkId::new("10s", rate), &rate, |b, &rate| {
            b.iter(|| black_box(BeatmatchStretcher.stretch(&channel, FORMAT.sample_rate, rate)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fade_gains, bench_synthesis, bench_stretch);
criterion_main!(benches);
