//! Benchmarks for the biquad filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::{
    biquad::{Biquad, BiquadCoefficients, BiquadType},
    Effect,
};

use crate::BLOCK_SIZES;

pub fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/biquad");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Every type costs the same per sample; one is enough
        let mut filter = Biquad::with_params(BiquadType::LowPass, 1_000.0, 48_000.0, 0.707, 0.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.process_block(black_box(&mut buffer));
            })
        });
    }

    // Coefficient design runs whenever a parameter changes
    for kind in BiquadType::ALL {
        group.bench_function(BenchmarkId::new("design", kind.label()), |b| {
            b.iter(|| {
                BiquadCoefficients::design(black_box(kind), 1_000.0, 48_000.0, 0.707, 6.0)
            })
        });
    }

    group.finish();
}
