//! Benchmarks for the feedback and ping-pong delay lines.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::{delay::DelayEffect, pingpong::PingPongDelay, Effect};

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Delay times in seconds
    let delay_times: &[f32] = &[
        0.01, // 10ms
        0.25, // 250ms
        1.0,  // 1 second
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &seconds in delay_times {
            let mut delay = DelayEffect::with_params(seconds, 48_000.0, 1, 0.35);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("feedback_{}ms", (seconds * 1_000.0) as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        delay.process_block(black_box(&mut buffer));
                    })
                },
            );
        }

        let mut ping_pong = PingPongDelay::with_params(0.33, 48_000.0, 0.0625);
        group.bench_with_input(BenchmarkId::new("ping_pong", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    let (left, right) = ping_pong.add_sample(black_box(sample));
                    sum += left + right;
                }
                sum
            })
        });
    }

    group.finish();
}
