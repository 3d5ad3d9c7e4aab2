//! Benchmarks for the complete audio callback.
//!
//! Each case builds the default demo set, switches to one demo, holds a
//! chord with its effect enabled and measures `generate_audio_samples` on
//! a stereo 48kHz buffer, master bus included.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::{
    demos,
    engine::{DemoContext, Key},
    EngineConfig, Session,
};

use crate::BLOCK_SIZES;

const CHANNELS: usize = 2;
const SAMPLE_RATE: f32 = 48_000.0;

/// (bench name, demo name, keys pressed after entering it)
const CASES: &[(&str, &str, &str)] = &[
    ("waveforms", "Waveforms", "2asdf"),
    ("delay", "Delay", "25asdf"),
    ("reverb", "Reverb", "25asdf"),
    ("flange", "Flange", "255asdf"),
    ("ducking", "Ducking", "12asdf"),
    ("stereo", "Stereo", "12asdf"),
    ("biquad", "Biquad Filter", "asdf"),
];

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");
    let context = DemoContext::without_samples(CHANNELS, SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * CHANNELS];

        for &(name, demo_name, keys) in CASES {
            let set = demos::default_registry().build(&context);
            let Some(demo) = set.names().iter().position(|&n| n == demo_name) else {
                panic!("no demo named {demo_name}");
            };
            let config = EngineConfig::default().initial_demo(demo);
            let (mut engine, mut input) = Session::new(config, set);

            input.enter_current();
            for key in keys.chars() {
                input.on_key(Key::Char(key), true);
            }

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    engine.generate_audio_samples(black_box(&mut buffer), CHANNELS, SAMPLE_RATE);
                })
            });
        }
    }

    group.finish();
}
