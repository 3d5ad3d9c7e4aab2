//! Lock-free parameter passing from the input thread to the audio thread.
//!
//! Every live parameter is an atomic that the input thread writes and the
//! audio thread reads once at the start of each buffer. Nothing here blocks
//! or allocates after construction.

use std::{
    marker::PhantomData,
    sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering},
};

/// A closed set of modes that can be cycled through with a key.
pub trait Cycle: Copy + PartialEq + Send + Sync + 'static {
    /// Every mode, in cycling order. The first entry is the default.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;
}

/// Atomic choice of one `T`, stored as an index into `T::ALL`.
pub struct Selector<T: Cycle> {
    index: AtomicUsize,
    _mode: PhantomData<fn() -> T>,
}

impl<T: Cycle> Selector<T> {
    pub fn new(initial: T) -> Self {
        Self {
            index: AtomicUsize::new(Self::position(initial)),
            _mode: PhantomData,
        }
    }

    fn position(mode: T) -> usize {
        T::ALL.iter().position(|&m| m == mode).unwrap_or(0)
    }

    #[inline]
    pub fn get(&self) -> T {
        let index = self.index.load(Ordering::Acquire);
        T::ALL[index.min(T::ALL.len().saturating_sub(1))]
    }

    pub fn set(&self, mode: T) {
        self.index.store(Self::position(mode), Ordering::Release);
    }

    /// Advance to the next mode, wrapping, and return it.
    pub fn next(&self) -> T {
        let len = T::ALL.len().max(1);
        let previous = self
            .index
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
            .unwrap_or(0);
        T::ALL[(previous + 1) % len]
    }

    /// Move one mode forward or back, stopping at either end, and return it.
    pub fn step(&self, forward: bool) -> T {
        let last = T::ALL.len().saturating_sub(1);
        let previous = self
            .index
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| {
                Some(if forward { (i + 1).min(last) } else { i.saturating_sub(1) })
            })
            .unwrap_or(0);
        let index = if forward {
            (previous + 1).min(last)
        } else {
            previous.saturating_sub(1)
        };
        T::ALL[index]
    }

    /// Back to the first mode.
    pub fn reset(&self) {
        self.index.store(0, Ordering::Release);
    }
}

impl<T: Cycle> Default for Selector<T> {
    fn default() -> Self {
        Self {
            index: AtomicUsize::new(0),
            _mode: PhantomData,
        }
    }
}

/// `f32` stored as raw bits.
#[derive(Debug, Default)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

/// Session-wide controls shared by `AudioEngine` and `SessionInput`.
#[derive(Debug)]
pub struct SessionControls {
    current_demo: AtomicUsize,
    volume: AtomicF32,
    clipping: AtomicBool,
    recording: AtomicBool,
}

/// What the audio thread sees for one buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSnapshot {
    pub current_demo: usize,
    pub volume: f32,
    pub clipping: bool,
    pub recording: bool,
}

impl SessionControls {
    pub const VOLUME_STEP: f32 = 0.1;

    pub fn new(volume: f32, clipping: bool) -> Self {
        Self {
            current_demo: AtomicUsize::new(0),
            volume: AtomicF32::new(volume.clamp(0.0, 1.0)),
            clipping: AtomicBool::new(clipping),
            recording: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            current_demo: self.current_demo.load(Ordering::Acquire),
            volume: self.volume.load(),
            clipping: self.clipping.load(Ordering::Acquire),
            recording: self.recording.load(Ordering::Acquire),
        }
    }

    pub fn current_demo(&self) -> usize {
        self.current_demo.load(Ordering::Acquire)
    }

    pub fn set_current_demo(&self, index: usize) {
        self.current_demo.store(index, Ordering::Release);
    }

    pub fn volume(&self) -> f32 {
        self.volume.load()
    }

    /// Add `delta` to the volume, clamped to [0, 1]. Returns the new value.
    pub fn adjust_volume(&self, delta: f32) -> f32 {
        let volume = (self.volume() + delta).clamp(0.0, 1.0);
        self.volume.store(volume);
        volume
    }

    pub fn clipping(&self) -> bool {
        self.clipping.load(Ordering::Acquire)
    }

    /// Flip clipping and return the new state.
    pub fn toggle_clipping(&self) -> bool {
        !self.clipping.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn recording(&self) -> bool {
        self.recording.load(Ordering::Acquire)
    }

    pub fn set_recording(&self, recording: bool) {
        self.recording.store(recording, Ordering::Release);
    }
}
