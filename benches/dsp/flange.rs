//! Benchmarks for the LFO flanger.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::{
    flange::{FlangeEffect, TapInterpolation},
    Effect,
};

use crate::BLOCK_SIZES;

pub fn bench_flange(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/flange");

    let modes = [
        ("linear", TapInterpolation::Linear),
        ("cubic", TapInterpolation::Cubic),
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for (name, interpolation) in modes {
            let mut flange = FlangeEffect::with_params(48_000.0, 1, 0.25, 0.02);
            flange.set_interpolation(interpolation);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    flange.process_block(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
