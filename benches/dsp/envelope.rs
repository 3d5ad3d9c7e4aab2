//! Benchmarks for envelope evaluation and note lifecycles.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::{
    envelope::{envelope, EnvelopePoint},
    Waveform,
};
use keysynth::synth::{Note, NoteShape};

use crate::BLOCK_SIZES;

const POINTS: [EnvelopePoint; 5] = [
    EnvelopePoint::new(0.0, 0.0),
    EnvelopePoint::new(0.01, 1.0),
    EnvelopePoint::new(0.02, 1.0),
    EnvelopePoint::new(0.04, 0.2),
    EnvelopePoint::new(0.215, 0.0),
];

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Raw point walk
        group.bench_with_input(BenchmarkId::new("five_point", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample = envelope(black_box(i as f32 / 48_000.0), &POINTS);
                }
            })
        });

        // Held note: envelope, phase and waveform per sample
        group.bench_with_input(BenchmarkId::new("gate_note", size), &size, |b, _| {
            let mut note = Note::new(440.0, Waveform::Sine, NoteShape::Gate);
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = note.generate_sample(48_000.0);
                }
            })
        });
    }

    group.finish();
}
