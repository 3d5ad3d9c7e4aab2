use crate::dsp::{
    effect::Effect,
    interpolate::{cubic_hermite, lerp},
    lfo::{bipolar_to_unipolar, Lfo},
    ring::{samples_for, CircularBuffer},
};

/*
Flanger
=======

A flanger mixes the input with a copy of itself whose delay sweeps slowly
back and forth. The sweep comes from a sine LFO:

    position = unipolar(sin(2π·phase)) × (frames - 1)

`position` is a fractional frame offset into the circular buffer, measured
ahead of the write index. Reading ahead of the write index means reading
older audio: offset 0 is the oldest frame still stored (one full buffer
ago) and offset frames-1 is the most recent one.

    write index
        │
        ▼
  [ .  .  .  x  ◦  ◦  ◦  ◦  ◦  ◦ ]
           newest  oldest ──────→ newer
                   ▲     ▲
                   │     └─ position = 1.4 frames
                   └─ position = 0

Fractional Taps
---------------

A position like 1.4 falls between two stored frames. Rounding would make
the delay jump in whole-sample steps, which is audible as zipper noise when
the LFO sweeps slowly. Instead the tap is interpolated:

  Linear   two neighbours, lerp by the fractional part
  Cubic    four neighbours, cubic Hermite through the middle pair

Cubic is the default; it keeps the high end of the delayed copy intact.

Neighbours are always a whole frame apart (stride = channel count), so a
stereo stream never mixes its left and right channels.

One Advance Per Frame
---------------------

`add_sample` never moves the LFO. The caller feeds every channel of a frame
and then calls `advance_phase` once. `process` is the mono shorthand that
does both. The `Effect` impl sees a flat interleaved stream, so it counts
channels and advances after the last channel of each frame.

Sweep Edges
-----------

At either end of the sweep the cubic read wants a neighbour outside the
stored span. Those reads are clamped to the first or last frame rather
than wrapping into audio from the other end of the line.
*/

/// How fractional tap positions are read from the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TapInterpolation {
    Linear,
    #[default]
    Cubic,
}

pub struct FlangeEffect {
    buffer: CircularBuffer,
    lfo: Lfo,
    channels: usize,
    /// Channel of the next sample fed through the `Effect` impl.
    channel: usize,
    interpolation: TapInterpolation,
}

impl FlangeEffect {
    pub fn new() -> Self {
        Self {
            buffer: CircularBuffer::default(),
            lfo: Lfo::default(),
            channels: 1,
            channel: 0,
            interpolation: TapInterpolation::default(),
        }
    }

    pub fn with_params(
        sample_rate: f32,
        channels: usize,
        frequency: f32,
        amplitude_seconds: f32,
    ) -> Self {
        let mut flange = Self::new();
        flange.set_effect_params(sample_rate, channels, frequency, amplitude_seconds);
        flange
    }

    /// Reallocate for a sweep of `amplitude_seconds` at `frequency` Hz.
    ///
    /// The LFO restarts from phase 0.
    pub fn set_effect_params(
        &mut self,
        sample_rate: f32,
        channels: usize,
        frequency: f32,
        amplitude_seconds: f32,
    ) {
        self.channels = channels.max(1);
        self.channel = 0;
        self.buffer
            .resize(samples_for(amplitude_seconds, sample_rate, self.channels));
        self.lfo.set_frequency(frequency, sample_rate);
    }

    pub fn set_interpolation(&mut self, interpolation: TapInterpolation) {
        self.interpolation = interpolation;
    }

    pub fn interpolation(&self) -> TapInterpolation {
        self.interpolation
    }

    pub fn len(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn phase(&self) -> f32 {
        self.lfo.phase()
    }

    fn frames(&self) -> usize {
        self.buffer.capacity() / self.channels
    }

    /// Current fractional tap position in frames, `0..=frames-1`.
    pub fn tap_position(&self) -> f32 {
        let span = self.frames().saturating_sub(1) as f32;
        bipolar_to_unipolar(self.lfo.sine()) * span
    }

    /// Mix one sample with its swept copy. Does not advance the LFO.
    #[inline]
    pub fn add_sample(&mut self, sample: f32) -> f32 {
        if self.buffer.is_empty() {
            return sample;
        }

        let tap = self.read_tap();
        self.buffer.write(sample);
        self.buffer.advance();
        sample + tap
    }

    /// Move the LFO one frame forward.
    #[inline]
    pub fn advance_phase(&mut self) {
        self.lfo.advance();
    }

    /// `add_sample` followed by `advance_phase`, for mono streams.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let out = self.add_sample(sample);
        self.advance_phase();
        out
    }

    /// Zero the buffer and restart the sweep.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
        self.lfo.reset();
        self.channel = 0;
    }

    /// Stored frame `frame` positions ahead of the write index, clamped to
    /// the buffer span.
    #[inline]
    fn frame_ahead(&self, frame: isize) -> f32 {
        let last = self.frames().saturating_sub(1) as isize;
        let frame = frame.clamp(0, last) as usize;
        self.buffer.ahead(frame * self.channels)
    }

    fn read_tap(&self) -> f32 {
        let position = self.tap_position();
        let whole = position.floor();
        let fraction = position - whole;
        let i = whole as isize;

        match self.interpolation {
            TapInterpolation::Linear => lerp(self.frame_ahead(i), self.frame_ahead(i + 1), fraction),
            TapInterpolation::Cubic => cubic_hermite(
                self.frame_ahead(i - 1),
                self.frame_ahead(i),
                self.frame_ahead(i + 1),
                self.frame_ahead(i + 2),
                fraction,
            ),
        }
    }
}

impl Default for FlangeEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for FlangeEffect {
    fn add_sample(&mut self, sample: f32) -> f32 {
        let out = FlangeEffect::add_sample(self, sample);
        self.channel += 1;
        if self.channel >= self.channels {
            self.channel = 0;
            self.advance_phase();
        }
        out
    }

    fn clear_buffer(&mut self) {
        FlangeEffect::clear_buffer(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amplitude_is_identity() {
        let mut flange = FlangeEffect::with_params(44_100.0, 2, 1.0, 0.0);
        assert!(flange.is_empty());
        assert_eq!(flange.process(0.5), 0.5);
        assert_eq!(flange.add_sample(-0.25), -0.25);
    }

    #[test]
    fn silence_stays_silent() {
        let mut flange = FlangeEffect::with_params(44_100.0, 1, 0.25, 0.02);
        for _ in 0..10_000 {
            assert_eq!(flange.process(0.0), 0.0);
        }
    }

    #[test]
    fn dc_input_settles_at_double() {
        // once the buffer is full of 1.0 every tap reads 1.0
        for interpolation in [TapInterpolation::Linear, TapInterpolation::Cubic] {
            let mut flange = FlangeEffect::with_params(1_000.0, 1, 1.0, 0.05);
            flange.set_interpolation(interpolation);
            for _ in 0..flange.len() {
                flange.process(1.0);
            }
            for _ in 0..500 {
                let out = flange.process(1.0);
                assert!((out - 2.0).abs() < 1e-5, "{interpolation:?}: {out}");
            }
        }
    }

    #[test]
    fn tap_position_sweeps_full_range() {
        let mut flange = FlangeEffect::with_params(1_000.0, 1, 1.0, 0.05);
        // phase 0: sin = 0 → middle of the buffer
        assert!((flange.tap_position() - 24.5).abs() < 1e-4);

        let (mut lo, mut hi) = (f32::MAX, f32::MIN);
        for _ in 0..1_000 {
            let p = flange.tap_position();
            lo = lo.min(p);
            hi = hi.max(p);
            flange.advance_phase();
        }
        assert!(lo < 0.01 && hi > 48.99, "sweep {lo}..{hi}");
    }

    #[test]
    fn add_sample_does_not_advance_lfo() {
        let mut flange = FlangeEffect::with_params(44_100.0, 2, 1.0, 0.02);
        flange.add_sample(0.1);
        flange.add_sample(0.1);
        assert_eq!(flange.phase(), 0.0);
        flange.advance_phase();
        assert!(flange.phase() > 0.0);
    }

    #[test]
    fn stereo_channels_do_not_mix() {
        let mut flange = FlangeEffect::with_params(1_000.0, 2, 2.0, 0.03);
        for _ in 0..2_000 {
            flange.add_sample(1.0);
            let right = flange.add_sample(0.0);
            assert_eq!(right, 0.0, "left signal leaked into the right channel");
            flange.advance_phase();
        }
    }

    #[test]
    fn clear_resets_phase_and_buffer() {
        let mut flange = FlangeEffect::with_params(1_000.0, 1, 3.0, 0.01);
        for _ in 0..123 {
            flange.process(0.8);
        }
        flange.clear_buffer();
        assert_eq!(flange.phase(), 0.0);
        for _ in 0..flange.len() {
            assert_eq!(flange.process(0.0), 0.0);
        }
    }

    #[test]
    fn single_frame_buffer_reads_its_only_slot() {
        let mut flange = FlangeEffect::with_params(100.0, 1, 1.0, 0.01);
        assert_eq!(flange.len(), 1);
        assert_eq!(flange.process(0.5), 0.5);
        assert!((flange.process(0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn effect_blocks_advance_once_per_frame() {
        let mut stereo = FlangeEffect::with_params(1_000.0, 2, 1.0, 0.02);
        stereo.process_block(&mut [0.0; 200]);
        assert!((stereo.phase() - 0.1).abs() < 1e-5, "{}", stereo.phase());

        let mut mono = FlangeEffect::with_params(1_000.0, 1, 1.0, 0.02);
        mono.process_block(&mut [0.0; 100]);
        assert!((mono.phase() - 0.1).abs() < 1e-5, "{}", mono.phase());
    }

    #[test]
    fn reconfigured_flange_is_silent_for_a_buffer() {
        let mut flange = FlangeEffect::with_params(1_000.0, 2, 1.0, 0.02);
        for i in 0..300 {
            Effect::add_sample(&mut flange, (i as f32 * 0.1).sin());
        }
        flange.set_effect_params(1_000.0, 2, 0.25, 0.03);
        flange.clear_buffer();
        assert_eq!(flange.phase(), 0.0);

        let mut zeros = vec![0.0; flange.len()];
        flange.process_block(&mut zeros);
        assert!(zeros.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn cubic_reads_stay_inside_the_sweep() {
        // 10 frames; frame 0 (oldest) holds 1.0, the rest are silent
        let mut flange = FlangeEffect::with_params(1_000.0, 1, 0.0, 0.01);
        flange.add_sample(1.0);
        for _ in 0..9 {
            flange.add_sample(0.0);
        }
        // the newest frame sits at the far end; a wrapped `after` read would
        // pull in the oldest frame's 1.0
        assert_eq!(flange.frame_ahead(9), 0.0);
        assert_eq!(flange.frame_ahead(10), 0.0);
        assert_eq!(flange.frame_ahead(-1), 1.0);
        assert_eq!(flange.frame_ahead(0), 1.0);
    }
}
