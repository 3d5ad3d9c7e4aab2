use std::sync::Arc;

/// A key event, already decoded from whatever terminal/window library
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Escape,
    /// F1..F12
    Function(u8),
}

/// One callback's worth of interleaved output.
pub struct AudioBlock<'a> {
    pub out: &'a mut [f32],
    pub channels: usize,
    pub sample_rate: f32,
    /// Frames rendered before this block since the stream started.
    pub sample_clock: u64,
}

impl<'a> AudioBlock<'a> {
    pub fn new(out: &'a mut [f32], channels: usize, sample_rate: f32, sample_clock: u64) -> Self {
        Self {
            out,
            channels: channels.max(1),
            sample_rate,
            sample_clock,
        }
    }

    pub fn frames(&self) -> usize {
        self.out.len() / self.channels
    }

    /// Seconds since the stream started at `frame` of this block.
    pub fn time_at(&self, frame: usize) -> f32 {
        ((self.sample_clock + frame as u64) as f64 / self.sample_rate as f64) as f32
    }

    /// Write `value` to every channel of `frame`.
    #[inline]
    pub fn fill_frame(&mut self, frame: usize, value: f32) {
        let start = frame * self.channels;
        if let Some(samples) = self.out.get_mut(start..start + self.channels) {
            samples.fill(value);
        }
    }

    /// Fill `frame` one channel at a time. Effects sized for interleaved
    /// audio run inside `value` so each channel gets its own delay line slot.
    #[inline]
    pub fn map_frame(&mut self, frame: usize, mut value: impl FnMut(usize) -> f32) {
        let start = frame * self.channels;
        if let Some(samples) = self.out.get_mut(start..start + self.channels) {
            for (channel, sample) in samples.iter_mut().enumerate() {
                *sample = value(channel);
            }
        }
    }

    pub fn silence(&mut self) {
        self.out.fill(0.0);
    }
}

/// Input-thread side of a demo.
///
/// Calls arrive from the thread reading the keyboard, never from the audio
/// thread. Implementations talk to their audio half through a voice bank and
/// atomics only.
pub trait KeyHandler: Send + Sync {
    /// Reset live parameters to their defaults. Called every time the demo
    /// becomes the current one.
    fn on_enter(&self);

    /// Handle a key the session did not consume. Returns a status line to
    /// show the user, if any.
    fn on_key(&self, key: Key, pressed: bool) -> Option<String>;

    /// Usage text printed when the demo is entered.
    fn help(&self) -> &'static str {
        ""
    }
}

/// Audio-thread side of a demo.
pub trait Demo: Send {
    fn name(&self) -> &'static str;

    fn key_handler(&self) -> Arc<dyn KeyHandler>;

    /// Render one block. The block arrives zeroed.
    fn generate_samples(&mut self, block: &mut AudioBlock<'_>);
}
