use crate::dsp::{
    effect::Effect,
    ring::{samples_for, CircularBuffer},
};

/*
Feedback Delay
==============

One circular buffer whose length *is* the delay time. Each sample we read
what is stored at the index (written one full buffer ago), scale it by the
feedback, add the new input, store the sum back and return it:

    buf[i] = buf[i] * feedback + x
    y      = buf[i]
    i      = (i + 1) % len

So the output contains the dry input immediately, then an echo every `len`
samples, each `feedback` times quieter than the last:

  impulse in:   1 0 0 ... 0 0 0 ... 0 0 0 ...
  feedback 0.5: 1 0 0 ... .5 0 0 ... .25 0 0 ...
                ^         ^           ^
                0         len         2*len

Feedback is deliberately not clamped. A value of 1.0 repeats forever and
anything above grows without bound; choosing a stable value is up to the
caller.
*/

pub struct DelayEffect {
    buffer: CircularBuffer,
    feedback: f32,
}

impl DelayEffect {
    /// An unconfigured delay, which passes audio through untouched.
    pub fn new() -> Self {
        Self {
            buffer: CircularBuffer::default(),
            feedback: 1.0,
        }
    }

    pub fn with_params(delay_time: f32, sample_rate: f32, channels: usize, feedback: f32) -> Self {
        let mut delay = Self::new();
        delay.set_effect_params(delay_time, sample_rate, channels, feedback);
        delay
    }

    /// Reallocate the delay line for `delay_time` seconds of interleaved audio.
    ///
    /// Any stored echo is discarded. A delay time that rounds to zero frames
    /// turns the effect into a pass-through.
    pub fn set_effect_params(
        &mut self,
        delay_time: f32,
        sample_rate: f32,
        channels: usize,
        feedback: f32,
    ) {
        self.buffer.resize(samples_for(delay_time, sample_rate, channels));
        self.feedback = feedback;
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Delay line length in samples (interleaved).
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

        let value = self.buffer.current() * self.feedback + sample;
        self.buffer.write(value);
        self.buffer.advance();
        value
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }
}

impl Default for DelayEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for DelayEffect {
    fn add_sample(&mut self, sample: f32) -> f32 {
        DelayEffect::add_sample(self, sample)
    }

    fn clear_buffer(&mut self) {
        DelayEffect::clear_buffer(self)
    }
}
