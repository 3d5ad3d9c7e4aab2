use std::sync::Arc;

use crate::{dsp::envelope::envelope_4pt, io::SampleBuffer};

use super::Voice;

/// Seconds of fade applied to both ends of a faded sample.
const FADE_SECONDS: f32 = 0.1;

/// Plays one loaded sample from the start, once.
///
/// Only the first channel of each frame is read; the demo decides how to
/// spread the mono result over the output channels. The voice dies when the
/// sample runs out or when it is released.
#[derive(Debug, Clone)]
pub struct SampleVoice {
    name: &'static str,
    buffer: Arc<SampleBuffer>,
    gain: f32,
    /// Fade length in seconds at both ends.
    fade: Option<f32>,
    level: f32,
    age: usize,
    dead: bool,
}

impl SampleVoice {
    pub fn new(name: &'static str, buffer: Arc<SampleBuffer>) -> Self {
        Self {
            name,
            buffer,
            gain: 1.0,
            fade: None,
            level: 0.0,
            age: 0,
            dead: false,
        }
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Fade in over the first 100 ms and out over the last 100 ms.
    pub fn with_fade(self) -> Self {
        self.with_fade_time(FADE_SECONDS)
    }

    pub fn with_fade_time(mut self, seconds: f32) -> Self {
        self.fade = Some(seconds);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn age(&self) -> usize {
        self.age
    }
}

impl Voice for SampleVoice {
    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        if self.dead {
            return 0.0;
        }

        let index = self.age * self.buffer.channels();
        if index >= self.buffer.len() {
            self.dead = true;
            return 0.0;
        }

        let seconds = self.age as f32 / sample_rate;
        self.age += 1;

        self.level = match self.fade {
            Some(fade) => {
                let length = self.buffer.length_seconds();
                envelope_4pt(
                    seconds,
                    (0.0, 0.0),
                    (fade, 1.0),
                    (length - fade, 1.0),
                    (length, 0.0),
                )
            }
            None => 1.0,
        };

        self.buffer.sample(index) * self.level * self.gain
    }

    /// Samples have no frequency; releases by frequency never match them.
    fn frequency(&self) -> f32 {
        f32::NAN
    }

    /// Stop immediately.
    fn release(&mut self) {
        self.dead = true;
    }

    fn is_dead(&self) -> bool {
        self.dead
    }

    fn envelope(&self) -> f32 {
        self.level
    }
}
