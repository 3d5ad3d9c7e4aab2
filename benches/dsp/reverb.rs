//! Benchmarks for the seven-tap reverb.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::{reverb::MultiTapReverb, Effect};

use crate::BLOCK_SIZES;

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();

        for channels in [1usize, 2] {
            let mut reverb = MultiTapReverb::with_params(48_000.0, channels);
            // interleaved, so the block carries size / channels frames
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("{channels}ch"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        reverb.process_block(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
