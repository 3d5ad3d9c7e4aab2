//! Multi-Tap Reverb - Early Reflections from One Delay Line
//!
//! A room is simulated by a handful of discrete reflections read from a
//! single circular buffer. Each tap reads what was written a fixed time ago
//! and scales it by its own gain.
//!
//! # Tap Layout
//!
//! ```text
//! Input ──┬─────────────────────────────────────────────(+)──→ Output
//!         │                                               ↑
//!         └──→ [ circular buffer, 0.662 s ] ──┬─ 79 ms  × 0.0562
//!                     ↑                       ├─ 130 ms × 0.0707
//!                     │                       ├─ 230 ms × 0.1778
//!                     │                       ├─ 340 ms × 0.0707
//!                     │                       ├─ 470 ms × 0.1412
//!                     │                       ├─ 532 ms × 0.0891
//!                     │                       └─ 662 ms × 0.2238
//!                     │                               │
//!                     └──────── × feedback ───────────┘ (sum of taps)
//! ```
//!
//! The buffer is exactly as long as the last tap, so the oldest sample still
//! held is the one the 662 ms tap reads.
//!
//! # Feedback
//!
//! With feedback 0 (the default) only the input is stored and the impulse
//! response is eight spikes: the dry sample and one per tap. Raising the
//! feedback re-injects the tap sum and turns the reflections into a tail.
//! Values are not clamped; the tap gains sum to about 0.83, so any feedback
//! up to 1.0 stays bounded.

use crate::dsp::{
    effect::Effect,
    ring::{samples_for, CircularBuffer},
};

/// Length of the delay line in seconds, equal to the last tap.
pub const REVERB_LENGTH_SECONDS: f32 = 0.662;

/// (time in seconds, gain) for each reflection.
pub const TAPS: [(f64, f32); 7] = [
    (0.079, 0.0562),
    (0.130, 0.0707),
    (0.230, 0.1778),
    (0.340, 0.0707),
    (0.470, 0.1412),
    (0.532, 0.0891),
    (0.662, 0.2238),
];

#[derive(Debug, Clone, Copy, Default)]
struct Tap {
    offset: usize,
    gain: f32,
}

pub struct MultiTapReverb {
    buffer: CircularBuffer,
    taps: [Tap; 7],
    feedback: f32,
}

impl MultiTapReverb {
    pub fn new() -> Self {
        Self {
            buffer: CircularBuffer::default(),
            taps: [Tap::default(); 7],
            feedback: 0.0,
        }
    }

    pub fn with_params(sample_rate: f32, channels: usize) -> Self {
        let mut reverb = Self::new();
        reverb.set_effect_params(sample_rate, channels);
        reverb
    }

    /// Reallocate the delay line and recompute the tap offsets.
    ///
    /// Tap offsets are counted in interleaved samples and clamped to the
    /// buffer length. An odd offset in stereo reads the other channel, so
    /// reflections blend across channels.
    pub fn set_effect_params(&mut self, sample_rate: f32, channels: usize) {
        let capacity = samples_for(REVERB_LENGTH_SECONDS, sample_rate, channels);
        self.buffer.resize(capacity);

        let scale = sample_rate as f64 * channels as f64;
        for (tap, &(seconds, gain)) in self.taps.iter_mut().zip(TAPS.iter()) {
            let offset = (seconds * scale).max(0.0) as usize;
            tap.offset = offset.clamp(1, capacity.max(1));
            tap.gain = gain;
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Offsets of the seven taps in samples, in table order.
    pub fn tap_offsets(&self) -> [usize; 7] {
        self.taps.map(|tap| tap.offset)
    }

    pub fn len(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn add_sample(&mut self, sample: f32) -> f32 {
        if self.buffer.is_empty() {
            return sample;
        }

        let reflections: f32 = self
            .taps
            .iter()
            .map(|tap| self.buffer.behind(tap.offset) * tap.gain)
            .sum();

        self.buffer.write(sample + reflections * self.feedback);
        self.buffer.advance();
        sample + reflections
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }
}

impl Default for MultiTapReverb {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for MultiTapReverb {
    fn add_sample(&mut self, sample: f32) -> f32 {
        MultiTapReverb::add_sample(self, sample)
    }

    fn clear_buffer(&mut self) {
        MultiTapReverb::clear_buffer(self)
    }
}
