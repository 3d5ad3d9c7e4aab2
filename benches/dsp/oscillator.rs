//! Benchmarks for waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::oscillator::{advance_phase, Waveform};

use crate::BLOCK_SIZES;

fn render(waveform: Waveform, phase: &mut f32, buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *phase = advance_phase(*phase, 440.0, 48_000.0);
        *sample = waveform.sample(*phase);
    }
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let waveforms = [
        ("sine", Waveform::Sine),
        ("saw", Waveform::Saw),
        ("square", Waveform::Square),
        ("triangle", Waveform::Triangle),
        // one sin() per harmonic
        ("saw_bl10", Waveform::BandLimitedSaw(10)),
        ("square_bl10", Waveform::BandLimitedSquare(10)),
        ("triangle_bl10", Waveform::BandLimitedTriangle(10)),
        ("noise", Waveform::Noise),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in waveforms {
            let mut phase = 0.0f32;
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| render(black_box(waveform), &mut phase, black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
