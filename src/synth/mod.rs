//! Notes, voice banks and the computer-keyboard note layout.
//!
//! A demo owns a [`VoiceBank`] shared between the input thread (which starts
//! and releases notes) and the audio thread (which renders and prunes them).

pub mod keyboard;
pub mod note;
pub mod sampler;
pub mod voices;

pub use keyboard::{key_to_frequency, note_to_frequency};
pub use note::{Glide, Lifecycle, Modulation, Note, NoteShape};
pub use sampler::SampleVoice;
pub use voices::VoiceBank;

/// Anything the voice bank can render.
pub trait Voice: Send {
    /// Produce the next sample and age the voice by one sample.
    fn next_sample(&mut self, sample_rate: f32) -> f32;

    /// Frequency the voice was started with; used to match key releases.
    fn frequency(&self) -> f32;

    /// Ask the voice to start its release.
    fn release(&mut self);

    fn is_dead(&self) -> bool;

    /// Envelope level (0 to 1) of the last sample produced. Sidechain
    /// ducking follows this; voices without an envelope never duck.
    fn envelope(&self) -> f32 {
        0.0
    }
}
