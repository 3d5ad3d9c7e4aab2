use crate::dsp::ring::{samples_for, CircularBuffer};

/*
Ping-Pong Delay
===============

Two delay lines cross-coupled so the echo bounces between the speakers:

            ┌──────────── × feedback ─────────────┐
            ▼                                     │
  x ──→ (+) ──→ [ left line ] ──→ echo_left ──→ [ right line ] ──→ echo_right
                                     │                               │
                                     ▼                               ▼
                                   left out                      right out

A sound enters the left line, comes out of the left speaker one delay
later, moves into the right line and comes out of the right speaker one
delay after that, then re-enters the left line scaled by the feedback. Each
full left → right → left round trip is `feedback` times quieter.

The dry signal is not part of the output; the caller adds it to whichever
channels it likes.
*/

/// Stereo cross-feedback echo.
pub struct PingPongDelay {
    left: CircularBuffer,
    right: CircularBuffer,
    feedback: f32,
}

impl PingPongDelay {
    pub fn new() -> Self {
        Self {
            left: CircularBuffer::default(),
            right: CircularBuffer::default(),
            feedback: 0.0,
        }
    }

    pub fn with_params(delay_time: f32, sample_rate: f32, feedback: f32) -> Self {
        let mut delay = Self::new();
        delay.set_effect_params(delay_time, sample_rate, feedback);
        delay
    }

    /// Reallocate both lines to `delay_time` seconds of frames.
    ///
    /// Input is one (mono) sample per frame; each line holds one channel.
    pub fn set_effect_params(&mut self, delay_time: f32, sample_rate: f32, feedback: f32) {
        let frames = samples_for(delay_time, sample_rate, 1);
        self.left.resize(frames);
        self.right.resize(frames);
        self.feedback = feedback;
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    /// Delay length in frames.
    pub fn len(&self) -> usize {
        self.left.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Feed one mono frame, get the (left, right) echoes back.
    #[inline]
    pub fn add_sample(&mut self, sample: f32) -> (f32, f32) {
        if self.left.is_empty() {
            return (0.0, 0.0);
        }

        let echo_left = self.left.current();
        let echo_right = self.right.current();

        self.left.write(sample + echo_right * self.feedback);
        self.right.write(echo_left);
        self.left.advance();
        self.right.advance();

        (echo_left, echo_right)
    }

    pub fn clear_buffer(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

impl Default for PingPongDelay {
    fn default() -> Self {
        Self::new()
    }
}
