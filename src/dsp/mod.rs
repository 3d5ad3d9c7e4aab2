//! Low-level DSP primitives used by the demos and the callback driver.
//!
//! Generators here are plain functions and never allocate. Effects own a
//! single buffer that is (re)allocated only by `set_effect_params`, so the
//! per-sample `add_sample` path is allocation-free and realtime-safe.

/// Biquad IIR filter with seven response types.
pub mod biquad;
/// Single-tap feedback delay.
pub mod delay;
/// Common interface for per-sample effects.
pub mod effect;
/// Piecewise-linear multi-point envelopes.
pub mod envelope;
/// Sine LFO driven flanger.
pub mod flange;
/// Linear and cubic Hermite interpolation.
pub mod interpolate;
/// Low frequency oscillator phase and helpers.
pub mod lfo;
/// Oscillator waveforms and noise sources.
pub mod oscillator;
/// Stereo ping-pong delay.
pub mod pingpong;
/// Seven-tap reverb.
pub mod reverb;
/// Owned circular buffer shared by every delay-line effect.
pub mod ring;
/// FFT magnitude analysis.
pub mod spectrum;

pub use effect::Effect;
pub use oscillator::Waveform;
