use std::sync::Mutex;

use super::{note::Note, Voice};

/// Shared list of sounding voices.
///
/// The input thread pushes and releases voices; the audio thread renders
/// them. The audio thread takes the lock once per buffer (in `render`), so
/// a key press waits at most one buffer.
pub struct VoiceBank<V = Note> {
    voices: Mutex<Vec<V>>,
}

impl<V: Voice> VoiceBank<V> {
    pub fn new() -> Self {
        Self {
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            voices: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn start(&self, voice: V) {
        if let Ok(mut voices) = self.voices.lock() {
            voices.push(voice);
        }
    }

    /// Release every voice started at `frequency`.
    pub fn release(&self, frequency: f32) {
        self.release_where(|voice| voice.frequency() == frequency);
    }

    pub fn release_where(&self, mut predicate: impl FnMut(&V) -> bool) {
        if let Ok(mut voices) = self.voices.lock() {
            for voice in voices.iter_mut().filter(|v| predicate(v)) {
                voice.release();
            }
        }
    }

    /// Whether any sounding voice matches `predicate`.
    pub fn any(&self, predicate: impl FnMut(&V) -> bool) -> bool {
        self.voices
            .lock()
            .map_or(false, |voices| voices.iter().any(predicate))
    }

    /// Drop every voice immediately.
    pub fn clear(&self) {
        if let Ok(mut voices) = self.voices.lock() {
            voices.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.voices.lock().map_or(0, |voices| voices.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render `frames` frames of the summed voices.
    ///
    /// `frame` is called once per frame with the frame index and the mixed
    /// value. Voices that died during the buffer are removed afterwards. If
    /// the lock is poisoned the buffer is rendered as silence.
    pub fn render(&self, frames: usize, sample_rate: f32, mut frame: impl FnMut(usize, f32)) {
        self.render_enveloped(frames, sample_rate, |i, value, _| frame(i, value));
    }

    /// Like `render`, also passing the loudest voice envelope of each frame.
    pub fn render_enveloped(
        &self,
        frames: usize,
        sample_rate: f32,
        mut frame: impl FnMut(usize, f32, f32),
    ) {
        let Ok(mut voices) = self.voices.lock() else {
            (0..frames).for_each(|i| frame(i, 0.0, 0.0));
            return;
        };

        for i in 0..frames {
            let mut value = 0.0;
            let mut loudest = 0.0f32;
            for voice in voices.iter_mut() {
                value += voice.next_sample(sample_rate);
                loudest = loudest.max(voice.envelope());
            }
            frame(i, value, loudest);
        }

        voices.retain(|voice| !voice.is_dead());
    }
}

impl<V: Voice> Default for VoiceBank<V> {
    fn default() -> Self {
        Self::new()
    }
}
