//! Record the master output to 16-bit WAV files.
//!
//! The audio thread must never touch the file system, so recording is split
//! in two halves joined by a lock-free ring buffer:
//!
//! ```text
//!   audio thread                          control thread
//!   ────────────                          ──────────────
//!   RecordTap::capture ──→ [ rtrb ring ] ──→ Recorder::flush ──→ hound WavWriter
//!   (push, never blocks)                     (drain, write, periodically)
//! ```
//!
//! If the control thread falls behind and the ring fills up, new samples are
//! dropped and counted instead of blocking the callback.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering},
        Arc,
    },
};

use hound::{SampleFormat, WavSpec, WavWriter};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::error::{Error, Result};

/// State both halves can see.
#[derive(Debug, Default)]
struct Shared {
    active: AtomicBool,
    channels: AtomicU32,
    sample_rate: AtomicU32,
    dropped: AtomicUsize,
}

/// Create a connected tap/recorder pair with room for `capacity` samples.
pub fn recording_channel(capacity: usize) -> (RecordTap, Recorder) {
    let (producer, consumer) = RingBuffer::<f32>::new(capacity.max(1));
    let shared = Arc::new(Shared::default());
    (
        RecordTap {
            producer,
            shared: Arc::clone(&shared),
        },
        Recorder {
            consumer,
            shared,
            writer: None,
            path: None,
        },
    )
}

/// Audio-thread half.
pub struct RecordTap {
    producer: Producer<f32>,
    shared: Arc<Shared>,
}

impl RecordTap {
    /// Copy one buffer of final output into the ring.
    ///
    /// Also publishes the stream format so the recorder can write a matching
    /// header. Does nothing unless a recording is active.
    pub fn capture(&mut self, samples: &[f32], channels: usize, sample_rate: f32) {
        self.shared.channels.store(channels as u32, Ordering::Relaxed);
        self.shared
            .sample_rate
            .store(sample_rate as u32, Ordering::Relaxed);

        if !self.shared.active.load(Ordering::Acquire) {
            return;
        }

        for &sample in samples {
            if self.producer.push(sample).is_err() {
                self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn is_recording(&self) -> bool {
        self.shared.active.load(Ordering::Acquire)
    }
}

/// Control-thread half.
pub struct Recorder {
    consumer: Consumer<f32>,
    shared: Arc<Shared>,
    writer: Option<WavWriter<BufWriter<File>>>,
    path: Option<PathBuf>,
}

impl Recorder {
    /// Open the first free `recording.wav`, `recording1.wav`, ... in `dir`.
    ///
    /// Fails if no audio has been captured yet, since the stream format is
    /// still unknown.
    pub fn start(&mut self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        if self.writer.is_some() {
            return Err(Error::AlreadyRecording);
        }

        let channels = self.shared.channels.load(Ordering::Relaxed);
        let sample_rate = self.shared.sample_rate.load(Ordering::Relaxed);
        if channels == 0 || sample_rate == 0 {
            return Err(Error::StreamNotRunning);
        }

        let path = next_free_path(dir.as_ref());
        let spec = WavSpec {
            channels: channels as u16,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(&path, spec)?;

        // stale samples from an earlier session
        while self.consumer.pop().is_ok() {}
        self.shared.dropped.store(0, Ordering::Relaxed);

        self.writer = Some(writer);
        self.path = Some(path.clone());
        self.shared.active.store(true, Ordering::Release);
        log::info!("recording to {}", path.display());
        Ok(path)
    }

    /// Move everything captured so far into the file. Returns the number of
    /// samples written.
    pub fn flush(&mut self) -> Result<usize> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(0);
        };

        let mut written = 0;
        while let Ok(sample) = self.consumer.pop() {
            writer.write_sample(to_i16(sample))?;
            written += 1;
        }
        Ok(written)
    }

    /// Stop capturing, write what is left and finalize the header.
    pub fn stop(&mut self) -> Result<PathBuf> {
        if self.writer.is_none() {
            return Err(Error::NotRecording);
        }
        self.shared.active.store(false, Ordering::Release);
        self.flush()?;

        let path = self.path.take().unwrap_or_default();
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
        }

        let dropped = self.dropped();
        if dropped > 0 {
            log::warn!("recording dropped {dropped} samples (ring buffer full)");
        }
        log::info!("recording saved to {}", path.display());
        Ok(path)
    }

    pub fn is_recording(&self) -> bool {
        self.writer.is_some()
    }

    /// Samples lost because the ring buffer was full.
    pub fn dropped(&self) -> usize {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if self.is_recording() {
            if let Err(err) = self.stop() {
                log::error!("failed to finalize recording: {err}");
            }
        }
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

fn next_free_path(dir: &Path) -> PathBuf {
    let mut index = 0usize;
    loop {
        let name = if index == 0 {
            "recording.wav".to_string()
        } else {
            format!("recording{index}.wav")
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
        index += 1;
    }
}
