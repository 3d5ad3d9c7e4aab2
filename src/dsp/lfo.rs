//! Low Frequency Oscillator (LFO) phase and conversion helpers.

/*
Low Frequency Oscillators
=========================

An LFO is simply an oscillator running at sub-audio frequencies. The same
waveform math applies, but instead of being heard directly the output
modulates some other parameter: the read position of a flanger, the volume
of a tremolo, the pitch of a vibrato.

Vocabulary
----------

  control-rate    Frequencies below human hearing: ~0.01 Hz to ~20 Hz.

  phase advance   How far the phase moves per sample: frequency / sample_rate.
                  At 0.25 Hz and 44.1 kHz that is ~5.7e-6 per sample.

  bipolar         Output swings -1.0 to +1.0.

  unipolar        Output swings 0.0 to 1.0.
                  Convert: unipolar = (bipolar + 1.0) / 2.0


One Advance Per Frame
---------------------

The LFO must move exactly once per output frame. If an effect is fed once
per channel, advancing inside the per-channel call would make a stereo
stream modulate twice as fast as a mono one. `Lfo` therefore separates
reading (`sine`) from moving (`advance`), and the owner decides when a frame
is complete.
*/

use crate::dsp::oscillator::{sine_wave, wrap_phase};

/// Free-running sine LFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lfo {
    phase: f32,
    phase_advance: f32,
}

impl Lfo {
    pub fn new(frequency_hz: f32, sample_rate: f32) -> Self {
        let mut lfo = Self::default();
        lfo.set_frequency(frequency_hz, sample_rate);
        lfo
    }

    /// Change the rate and restart the cycle from phase 0.
    pub fn set_frequency(&mut self, frequency_hz: f32, sample_rate: f32) {
        self.phase = 0.0;
        self.phase_advance = if sample_rate > 0.0 {
            frequency_hz / sample_rate
        } else {
            0.0
        };
    }

    /// Bipolar sine value at the current phase.
    #[inline]
    pub fn sine(&self) -> f32 {
        sine_wave(self.phase)
    }

    /// Move one sample forward.
    #[inline]
    pub fn advance(&mut self) {
        self.phase = wrap_phase(self.phase + self.phase_advance);
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn phase_advance(&self) -> f32 {
        self.phase_advance
    }
}

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bipolar_to_unipolar() {
        assert!((bipolar_to_unipolar(-1.0) - 0.0).abs() < 1e-6);
        assert!((bipolar_to_unipolar(0.0) - 0.5).abs() < 1e-6);
        assert!((bipolar_to_unipolar(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn lfo_completes_one_cycle_per_period() {
        // 10 Hz at 1 kHz: 100 samples per cycle
        let mut lfo = Lfo::new(10.0, 1_000.0);
        assert!((lfo.phase_advance() - 0.01).abs() < 1e-9);

        for _ in 0..25 {
            lfo.advance();
        }
        assert!((lfo.sine() - 1.0).abs() < 1e-3, "quarter cycle should peak");

        for _ in 0..75 {
            lfo.advance();
        }
        assert!(lfo.phase() < 1e-3 || lfo.phase() > 0.999);
    }

    #[test]
    fn set_frequency_restarts_phase() {
        let mut lfo = Lfo::new(1.0, 100.0);
        lfo.advance();
        lfo.advance();
        lfo.set_frequency(2.0, 100.0);
        assert_eq!(lfo.phase(), 0.0);
        assert!((lfo.phase_advance() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn zero_sample_rate_freezes() {
        let mut lfo = Lfo::new(5.0, 0.0);
        lfo.advance();
        assert_eq!(lfo.phase(), 0.0);
    }
}
