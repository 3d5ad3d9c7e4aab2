//! Benchmarks for low-level DSP primitives.

mod biquad;
mod delay;
mod envelope;
mod flange;
mod oscillator;
mod reverb;

pub use biquad::bench_biquad;
pub use delay::bench_delay;
pub use envelope::bench_envelope;
pub use flange::bench_flange;
pub use oscillator::bench_oscillator;
pub use reverb::bench_reverb;
