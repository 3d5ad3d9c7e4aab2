use std::f64::consts::{PI, SQRT_2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Biquad Filters
==============

A biquad is a second-order IIR filter: two zeros, two poles, five
coefficients. Every classic EQ shape is the same difference equation with
different coefficients, so one struct covers all of them.

Direct Form I
-------------

    y[n] = a0·x[n] + a1·x[n-1] + a2·x[n-2] - b1·y[n-1] - b2·y[n-2]

Here the `a` coefficients weight the input history (zeros) and the `b`
coefficients weight the output history (poles). The coefficients are
normalized so there is no b0.

  x ──┬──────── ×a0 ──(+)──────────────┬──→ y
      z⁻¹               ↑              z⁻¹
      ├──────── ×a1 ────┤──── ×-b1 ────┤
      z⁻¹               │              z⁻¹
      └──────── ×a2 ────┴──── ×-b2 ────┘

Direct form I keeps the input and output histories separately (x1, x2,
y1, y2). It costs two more state values than direct form II but behaves
better when coefficients are swapped mid-stream.

Designing Coefficients
----------------------

All seven shapes come from the bilinear transform of analog prototypes.
Two intermediate values appear everywhere:

  K = tan(π · cutoff / sample_rate)     pre-warped cutoff
  V = 10^(|gain_db| / 20)               linear gain for peak and shelves

| type       | passes               | Q meaning     | uses gain |
| ---------- | -------------------- | ------------- | --------- |
| low-pass   | below cutoff         | resonance     | no        |
| high-pass  | above cutoff         | resonance     | no        |
| band-pass  | around cutoff        | bandwidth     | no        |
| notch      | all but cutoff       | bandwidth     | no        |
| peak       | all, ± gain at cut.  | bandwidth     | yes       |
| low shelf  | all, ± gain below    | (fixed √2)    | yes       |
| high shelf | all, ± gain above    | (fixed √2)    | yes       |

Peak and shelf filters use a different formula for boost and for cut so
that a cut is the exact inverse of the same-sized boost.

Coefficients are computed in f64 and stored as f32; near-DC cutoffs lose
precision otherwise.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BiquadType {
    #[default]
    LowPass,
    HighPass,
    BandPass,
    Notch,
    Peak,
    LowShelf,
    HighShelf,
}

impl BiquadType {
    pub const ALL: [BiquadType; 7] = [
        BiquadType::LowPass,
        BiquadType::HighPass,
        BiquadType::BandPass,
        BiquadType::Notch,
        BiquadType::Peak,
        BiquadType::LowShelf,
        BiquadType::HighShelf,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BiquadType::LowPass => "low-pass",
            BiquadType::HighPass => "high-pass",
            BiquadType::BandPass => "band-pass",
            BiquadType::Notch => "notch",
            BiquadType::Peak => "peak",
            BiquadType::LowShelf => "low shelf",
            BiquadType::HighShelf => "high shelf",
        }
    }
}

/// Normalized biquad coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
    pub b1: f32,
    pub b2: f32,
}

impl BiquadCoefficients {
    /// Pass-through.
    pub const IDENTITY: Self = Self {
        a0: 1.0,
        a1: 0.0,
        a2: 0.0,
        b1: 0.0,
        b2: 0.0,
    };

    pub fn design(
        kind: BiquadType,
        cutoff: f32,
        sample_rate: f32,
        q: f32,
        peak_gain_db: f32,
    ) -> Self {
        let k = (PI * cutoff as f64 / sample_rate as f64).tan();
        let q = q as f64;
        let gain = peak_gain_db as f64;
        let v = 10f64.powf(gain.abs() / 20.0);
        let kk = k * k;

        let (a0, a1, a2, b1, b2) = match kind {
            BiquadType::LowPass => {
                let norm = 1.0 / (1.0 + k / q + kk);
                let a0 = kk * norm;
                (a0, 2.0 * a0, a0, 2.0 * (kk - 1.0) * norm, (1.0 - k / q + kk) * norm)
            }
            BiquadType::HighPass => {
                let norm = 1.0 / (1.0 + k / q + kk);
                let a0 = norm;
                (a0, -2.0 * a0, a0, 2.0 * (kk - 1.0) * norm, (1.0 - k / q + kk) * norm)
            }
            BiquadType::BandPass => {
                let norm = 1.0 / (1.0 + k / q + kk);
                let a0 = k / q * norm;
                (a0, 0.0, -a0, 2.0 * (kk - 1.0) * norm, (1.0 - k / q + kk) * norm)
            }
            BiquadType::Notch => {
                let norm = 1.0 / (1.0 + k / q + kk);
                let a0 = (1.0 + kk) * norm;
                let a1 = 2.0 * (kk - 1.0) * norm;
                (a0, a1, a0, a1, (1.0 - k / q + kk) * norm)
            }
            BiquadType::Peak => {
                let a1 = |norm: f64| 2.0 * (kk - 1.0) * norm;
                if gain >= 0.0 {
                    let norm = 1.0 / (1.0 + k / q + kk);
                    (
                        (1.0 + v / q * k + kk) * norm,
                        a1(norm),
                        (1.0 - v / q * k + kk) * norm,
                        a1(norm),
                        (1.0 - k / q + kk) * norm,
                    )
                } else {
                    let norm = 1.0 / (1.0 + v / q * k + kk);
                    (
                        (1.0 + k / q + kk) * norm,
                        a1(norm),
                        (1.0 - k / q + kk) * norm,
                        a1(norm),
                        (1.0 - v / q * k + kk) * norm,
                    )
                }
            }
            BiquadType::LowShelf => {
                let root_2v = (2.0 * v).sqrt();
                if gain >= 0.0 {
                    let norm = 1.0 / (1.0 + SQRT_2 * k + kk);
                    (
                        (1.0 + root_2v * k + v * kk) * norm,
                        2.0 * (v * kk - 1.0) * norm,
                        (1.0 - root_2v * k + v * kk) * norm,
                        2.0 * (kk - 1.0) * norm,
                        (1.0 - SQRT_2 * k + kk) * norm,
                    )
                } else {
                    let norm = 1.0 / (1.0 + root_2v * k + v * kk);
                    (
                        (1.0 + SQRT_2 * k + kk) * norm,
                        2.0 * (kk - 1.0) * norm,
                        (1.0 - SQRT_2 * k + kk) * norm,
                        2.0 * (v * kk - 1.0) * norm,
                        (1.0 - root_2v * k + v * kk) * norm,
                    )
                }
            }
            BiquadType::HighShelf => {
                let root_2v = (2.0 * v).sqrt();
                if gain >= 0.0 {
                    let norm = 1.0 / (1.0 + SQRT_2 * k + kk);
                    (
                        (v + root_2v * k + kk) * norm,
                        2.0 * (kk - v) * norm,
                        (v - root_2v * k + kk) * norm,
                        2.0 * (kk - 1.0) * norm,
                        (1.0 - SQRT_2 * k + kk) * norm,
                    )
                } else {
                    let norm = 1.0 / (v + root_2v * k + kk);
                    (
                        (1.0 + SQRT_2 * k + kk) * norm,
                        2.0 * (kk - 1.0) * norm,
                        (1.0 - SQRT_2 * k + kk) * norm,
                        2.0 * (kk - v) * norm,
                        (v - root_2v * k + kk) * norm,
                    )
                }
            }
        };

        Self {
            a0: a0 as f32,
            a1: a1 as f32,
            a2: a2 as f32,
            b1: b1 as f32,
            b2: b2 as f32,
        }
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Direct form I biquad.
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    kind: BiquadType,
    coefficients: BiquadCoefficients,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// An identity filter until `set_effect_params` is called.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(
        kind: BiquadType,
        cutoff: f32,
        sample_rate: f32,
        q: f32,
        peak_gain_db: f32,
    ) -> Self {
        let mut filter = Self::new();
        filter.set_effect_params(kind, cutoff, sample_rate, q, peak_gain_db);
        filter
    }

    /// Recompute every coefficient and reset the history.
    pub fn set_effect_params(
        &mut self,
        kind: BiquadType,
        cutoff: f32,
        sample_rate: f32,
        q: f32,
        peak_gain_db: f32,
    ) {
        self.kind = kind;
        self.coefficients = BiquadCoefficients::design(kind, cutoff, sample_rate, q, peak_gain_db);
        self.clear_buffer();
    }

    pub fn kind(&self) -> BiquadType {
        self.kind
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coefficients
    }

    #[inline]
    pub fn add_sample(&mut self, sample: f32) -> f32 {
        let c = &self.coefficients;
        let out = c.a0 * sample + c.a1 * self.x1 + c.a2 * self.x2 - c.b1 * self.y1 - c.b2 * self.y2;

        self.x2 = self.x1;
        self.x1 = sample;
        self.y2 = self.y1;
        self.y1 = out;
        out
    }

    pub fn clear_buffer(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl crate::dsp::Effect for Biquad {
    fn add_sample(&mut self, sample: f32) -> f32 {
        Biquad::add_sample(self, sample)
    }

    fn clear_buffer(&mut self) {
        Biquad::clear_buffer(self)
    }
}
