#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::{PI, TAU};

/*
Waveforms
=========

Every generator here maps a normalized phase in [0, 1) to a sample in
[-1, 1]. They hold no state: the caller owns the phase and advances it by
`frequency / sample_rate` each sample (see `advance_phase`).

  phase   0.0        0.25       0.5        0.75       1.0
  sine    0 ──╱▔▔╲── 1 ─────── 0 ──╲__╱── -1 ──────── 0
  saw    -1 ────────────────── 0 ─────────────────→ 1 (then jumps back)
  square -1 ────────────────── 1 ───────────────────
  tri     1 ╲                -1                  ╱ 1

Naive saw/square/triangle jump (or kink) instantly, which puts energy at
every harmonic including those above Nyquist. Those alias back down as
inharmonic fizz on high notes.

Band-Limited Variants
---------------------

The band-limited versions build the same shapes from a finite Fourier sum,
so only `harmonics` partials exist and nothing above them can alias:

  saw       -(2/π)  Σ  sin(2π k p) / k        k = 1, 2, 3, ...
  square    -(4/π)  Σ  sin(2π k p) / k        k = 1, 3, 5, ...
  triangle   (8/π²) Σ  cos(2π k p) / k²       k = 1, 3, 5, ...

Signs are chosen so each sum converges to the naive waveform above as the
harmonic count grows. Cost is linear in the harmonic count.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
    Triangle,
    /// Fourier saw with the given number of harmonics.
    BandLimitedSaw(usize),
    /// Fourier square with the given number of (odd) harmonics.
    BandLimitedSquare(usize),
    /// Fourier triangle with the given number of (odd) harmonics.
    BandLimitedTriangle(usize),
    Noise,
}

impl Waveform {
    /// Evaluate the waveform at `phase`.
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => sine_wave(phase),
            Waveform::Saw => saw_wave(phase),
            Waveform::Square => square_wave(phase),
            Waveform::Triangle => triangle_wave(phase),
            Waveform::BandLimitedSaw(harmonics) => saw_wave_band_limited(phase, harmonics),
            Waveform::BandLimitedSquare(harmonics) => square_wave_band_limited(phase, harmonics),
            Waveform::BandLimitedTriangle(harmonics) => {
                triangle_wave_band_limited(phase, harmonics)
            }
            Waveform::Noise => noise(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Saw => "Saw",
            Waveform::Square => "Square",
            Waveform::Triangle => "Triangle",
            Waveform::BandLimitedSaw(_) => "Bandlimited Saw",
            Waveform::BandLimitedSquare(_) => "Bandlimited Square",
            Waveform::BandLimitedTriangle(_) => "Bandlimited Triangle",
            Waveform::Noise => "Noise",
        }
    }
}

/// Advance a phase by one sample of `frequency` and wrap it back into [0, 1).
#[inline]
pub fn advance_phase(phase: f32, frequency: f32, sample_rate: f32) -> f32 {
    wrap_phase(phase + frequency / sample_rate)
}

/// Wrap any phase value into [0, 1).
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[inline]
pub fn sine_wave(phase: f32) -> f32 {
    (phase * TAU).sin()
}

#[inline]
pub fn saw_wave(phase: f32) -> f32 {
    phase * 2.0 - 1.0
}

#[inline]
pub fn square_wave(phase: f32) -> f32 {
    if phase >= 0.5 {
        1.0
    } else {
        -1.0
    }
}

#[inline]
pub fn triangle_wave(phase: f32) -> f32 {
    (phase - 0.5).abs() * 4.0 - 1.0
}

pub fn saw_wave_band_limited(phase: f32, harmonics: usize) -> f32 {
    let mut sum = 0.0;
    for k in 1..=harmonics {
        let k = k as f32;
        sum += sine_wave(phase * k) / k;
    }
    -sum * 2.0 / PI
}

pub fn square_wave_band_limited(phase: f32, harmonics: usize) -> f32 {
    let mut sum = 0.0;
    for i in 0..harmonics {
        let k = (i * 2 + 1) as f32;
        sum += sine_wave(phase * k) / k;
    }
    -sum * 4.0 / PI
}

pub fn triangle_wave_band_limited(phase: f32, harmonics: usize) -> f32 {
    let mut sum = 0.0;
    for i in 0..harmonics {
        let k = (i * 2 + 1) as f32;
        sum += (phase * k * TAU).cos() / (k * k);
    }
    sum * 8.0 / (PI * PI)
}

/// Uniform white noise in [-1, 1).
#[inline]
pub fn noise() -> f32 {
    rand::random::<f32>() * 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHASES: [f32; 8] = [0.0, 0.1, 0.25, 0.4, 0.5, 0.6, 0.75, 0.99];

    #[test]
    fn closed_form_waves_match_definitions() {
        for &p in &PHASES {
            assert!((sine_wave(p) - (TAU * p).sin()).abs() < 1e-6);
            assert!((saw_wave(p) - (2.0 * p - 1.0)).abs() < 1e-6);

            let square = square_wave(p);
            assert!(square == 1.0 || square == -1.0);
            assert_eq!(square > 0.0, p >= 0.5, "square should flip at 0.5, phase {p}");
        }

        assert_eq!(triangle_wave(0.0), 1.0);
        assert_eq!(triangle_wave(0.5), -1.0);
        assert!(triangle_wave(0.25).abs() < 1e-6);
    }

    #[test]
    fn band_limited_saw_converges() {
        for &p in &[0.1f32, 0.25, 0.4, 0.6, 0.75] {
            let approx = saw_wave_band_limited(p, 2000);
            assert!(
                (approx - saw_wave(p)).abs() < 0.01,
                "phase {p}: expected {}, got {approx}",
                saw_wave(p)
            );
        }
    }

    #[test]
    fn band_limited_square_converges() {
        for &p in &[0.1f32, 0.25, 0.4, 0.6, 0.75, 0.9] {
            let approx = square_wave_band_limited(p, 2000);
            assert!(
                (approx - square_wave(p)).abs() < 0.01,
                "phase {p}: expected {}, got {approx}",
                square_wave(p)
            );
        }
    }

    #[test]
    fn band_limited_triangle_converges() {
        for &p in &PHASES {
            let approx = triangle_wave_band_limited(p, 200);
            assert!(
                (approx - triangle_wave(p)).abs() < 0.01,
                "phase {p}: expected {}, got {approx}",
                triangle_wave(p)
            );
        }
    }

    #[test]
    fn single_harmonic_is_a_sine() {
        // One harmonic of the saw is just an inverted, scaled sine.
        let p = 0.2;
        let expected = -sine_wave(p) * 2.0 / PI;
        assert!((saw_wave_band_limited(p, 1) - expected).abs() < 1e-6);
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut phase = 0.0;
        for _ in 0..100_000 {
            phase = advance_phase(phase, 1234.5, 44_100.0);
            assert!((0.0..1.0).contains(&phase), "phase escaped: {phase}");
        }
        assert_eq!(wrap_phase(1.0), 0.0);
        assert!((wrap_phase(-0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn noise_is_bounded_and_not_constant() {
        let samples: Vec<f32> = (0..256).map(|_| noise()).collect();
        assert!(samples.iter().all(|s| (-1.0..1.0).contains(s)));
        assert!(samples.iter().any(|&s| s != samples[0]));
    }

    #[test]
    fn band_limited_waves_hold_only_their_harmonics() {
        use crate::dsp::spectrum::SpectrumAnalyzer;
        use std::f32::consts::PI;

        // 100 Hz for one second at 8 kHz: every harmonic lands on a 1 Hz bin
        let sr = 8_000.0;
        let render = |wave: Waveform| -> Vec<f32> {
            (0..8_000)
                .map(|i| wave.sample((i as f32 * 100.0 / sr).fract()))
                .collect()
        };
        let mut analyzer = SpectrumAnalyzer::new(8_000, sr);

        analyzer.analyze(&render(Waveform::BandLimitedSaw(10)));
        for k in 1..=10 {
            let expected = 2.0 / (PI * k as f32);
            let got = analyzer.magnitude_at(100.0 * k as f32);
            assert!((got - expected).abs() < 0.01, "saw harmonic {k}: {got}");
        }
        assert!(analyzer.magnitude_at(1_100.0) < 1e-3);

        analyzer.analyze(&render(Waveform::BandLimitedSquare(5)));
        for k in [1, 3, 5, 7, 9] {
            let expected = 4.0 / (PI * k as f32);
            let got = analyzer.magnitude_at(100.0 * k as f32);
            assert!((got - expected).abs() < 0.01, "square harmonic {k}: {got}");
        }
        for k in [2, 4, 6, 11] {
            assert!(analyzer.magnitude_at(100.0 * k as f32) < 1e-3, "square harmonic {k}");
        }
    }
}
