//! Benchmarks for voice banks.
//!
//! A chord held on the band-limited instruments is the most expensive thing
//! a demo does per sample: every harmonic is a sin() call.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::{
    dsp::Waveform,
    synth::{key_to_frequency, Note, NoteShape, VoiceBank},
};

use crate::BLOCK_SIZES;

/// A ten-note chord held on `waveform`.
fn held_chord(waveform: Waveform) -> VoiceBank {
    let bank = VoiceBank::with_capacity(16);
    for key in "asdfghjkl;".chars() {
        if let Some(frequency) = key_to_frequency(key) {
            bank.start(Note::new(frequency, waveform, NoteShape::Gate).with_gain(0.8));
        }
    }
    bank
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    let chords = [
        ("sine_x10", Waveform::Sine),
        ("saw_bl10_x10", Waveform::BandLimitedSaw(10)),
        ("square_bl10_x10", Waveform::BandLimitedSquare(10)),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in chords {
            let bank = held_chord(waveform);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    bank.render(size, 48_000.0, |i, value| buffer[i] = value);
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
