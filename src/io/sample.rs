use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::io::wav;

/// Decoded PCM audio, interleaved, already converted to the output format.
///
/// Immutable once loaded; shared between demos through `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    channels: usize,
    sample_rate: f32,
    length_seconds: f32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, channels: usize, sample_rate: f32) -> Self {
        let channels = channels.max(1);
        let frames = samples.len() / channels;
        let length_seconds = if sample_rate > 0.0 {
            frames as f32 / sample_rate
        } else {
            0.0
        };
        Self {
            samples,
            channels,
            sample_rate,
            length_seconds,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn length_seconds(&self) -> f32 {
        self.length_seconds
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Interleaved sample at `index`, or silence past the end.
    #[inline]
    pub fn sample(&self, index: usize) -> f32 {
        self.samples.get(index).copied().unwrap_or(0.0)
    }
}

/// Names of the bundled one-shot samples, loaded from `<dir>/<name>.wav`.
pub const SAMPLE_NAMES: [&str; 7] = ["clap", "cymbal", "kick", "legend1", "legend2", "ting", "pvd"];

/// Named samples decoded for one output format.
#[derive(Debug, Clone, Default)]
pub struct SampleLibrary {
    samples: HashMap<String, Arc<SampleBuffer>>,
}

impl SampleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every entry of [`SAMPLE_NAMES`] from `dir`.
    ///
    /// A file that fails to load is logged and left out; playing it later
    /// yields silence.
    pub fn load_dir(dir: impl AsRef<Path>, channels: usize, sample_rate: f32) -> Self {
        let dir = dir.as_ref();
        let mut library = Self::new();
        for name in SAMPLE_NAMES {
            let path: PathBuf = dir.join(format!("{name}.wav"));
            match wav::load(&path, channels, sample_rate, true) {
                Ok(buffer) => {
                    log::debug!(
                        "loaded {} ({:.2}s, {} frames)",
                        path.display(),
                        buffer.length_seconds(),
                        buffer.frame_count()
                    );
                    library.insert(name, buffer);
                }
                Err(err) => log::warn!("sample '{name}' unavailable: {err}"),
            }
        }
        library
    }

    pub fn insert(&mut self, name: impl Into<String>, buffer: SampleBuffer) {
        self.samples.insert(name.into(), Arc::new(buffer));
    }

    pub fn get(&self, name: &str) -> Option<Arc<SampleBuffer>> {
        self.samples.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_past_end_as_silence() {
        let buffer = SampleBuffer::new(vec![0.1, 0.2, 0.3, 0.4], 2, 2.0);
        assert_eq!(buffer.frame_count(), 2);
        assert_eq!(buffer.length_seconds(), 1.0);
        assert_eq!(buffer.sample(3), 0.4);
        assert_eq!(buffer.sample(4), 0.0);
        assert_eq!(buffer.sample(usize::MAX), 0.0);
    }

    #[test]
    fn missing_directory_gives_empty_library() {
        let library = SampleLibrary::load_dir("/definitely/not/here", 2, 44_100.0);
        assert!(library.is_empty());
        assert!(library.get("kick").is_none());
    }

    #[test]
    fn inserted_samples_are_shared() {
        let mut library = SampleLibrary::new();
        library.insert("ting", SampleBuffer::new(vec![1.0; 8], 1, 8.0));
        let a = library.get("ting");
        let b = library.get("ting");
        assert!(matches!((a, b), (Some(a), Some(b)) if Arc::ptr_eq(&a, &b)));
    }
}
