use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Session settings. Everything here is read once when the session is built.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Master volume at startup, 0..=1.
    pub initial_volume: f32,
    /// Hard clip the master output to [-1, 1].
    pub clipping: bool,
    /// Seconds of audio the recording ring buffer holds between flushes.
    pub recording_buffer_seconds: f32,
    /// Directory containing the bundled `.wav` samples.
    pub samples_dir: PathBuf,
    /// Directory new recordings are written to.
    pub recording_dir: PathBuf,
    /// Index of the demo that is current at startup.
    pub initial_demo: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_volume: 0.9,
            clipping: false,
            recording_buffer_seconds: 4.0,
            samples_dir: PathBuf::from("Samples"),
            recording_dir: PathBuf::from("."),
            initial_demo: 0,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.initial_volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn clipping(mut self, clipping: bool) -> Self {
        self.clipping = clipping;
        self
    }

    pub fn recording_buffer_seconds(mut self, seconds: f32) -> Self {
        self.recording_buffer_seconds = seconds.max(0.0);
        self
    }

    pub fn samples_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.samples_dir = dir.into();
        self
    }

    pub fn recording_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recording_dir = dir.into();
        self
    }

    pub fn initial_demo(mut self, index: usize) -> Self {
        self.initial_demo = index;
        self
    }

    /// Ring buffer capacity in samples for the given stream format.
    pub fn recording_capacity(&self, channels: usize, sample_rate: f32) -> usize {
        crate::dsp::ring::samples_for(self.recording_buffer_seconds, sample_rate, channels.max(1))
            .max(1)
    }
}
