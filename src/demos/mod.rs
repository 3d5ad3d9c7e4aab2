//! Bundled keyboard demos.
//!
//! Each demo is a small instrument built from the `dsp` primitives. The
//! letter rows of the keyboard play notes, the number keys change what the
//! demo does. Use these to hear what each primitive contributes, or study
//! them to see how the primitives are meant to be combined.
//!
//! # Example
//!
//! ```ignore
//! use keysynth::{demos, engine::DemoContext, EngineConfig, Session};
//!
//! let context = DemoContext::without_samples(2, 48_000.0);
//! let set = demos::default_registry().build(&context);
//! let (mut engine, mut input) = Session::new(EngineConfig::default(), set);
//! ```

mod clipping;
mod delay;
mod drums;
mod ducking;
mod envelopes;
mod filter;
mod flange;
mod fm;
mod modulation;
mod popping;
mod reverb;
mod stereo;
mod waveforms;

pub use clipping::ClippingDemo;
pub use delay::DelayDemo;
pub use drums::DrumDemo;
pub use ducking::DuckingDemo;
pub use envelopes::EnvelopeDemo;
pub use filter::FilterDemo;
pub use flange::FlangeDemo;
pub use fm::FmDemo;
pub use modulation::ModulationDemo;
pub use popping::PoppingDemo;
pub use reverb::ReverbDemo;
pub use stereo::StereoDemo;
pub use waveforms::WaveformDemo;

use crate::{
    dsp::Waveform,
    engine::{Cycle, DemoRegistry, Key},
    synth::{key_to_frequency, note_to_frequency, Note, SampleVoice, Voice},
};

/// Every bundled demo, in presentation order.
pub fn default_registry() -> DemoRegistry {
    DemoRegistry::new()
        .register("Waveforms", |ctx| Box::new(WaveformDemo::new(ctx)))
        .register("Popping", |ctx| Box::new(PoppingDemo::new(ctx)))
        .register("Clipping", |ctx| Box::new(ClippingDemo::new(ctx)))
        .register("Envelopes", |ctx| Box::new(EnvelopeDemo::new(ctx)))
        .register("Tremolo & Vibrato", |ctx| Box::new(ModulationDemo::new(ctx)))
        .register("FM Synthesis", |ctx| Box::new(FmDemo::new(ctx)))
        .register("Delay", |ctx| Box::new(DelayDemo::new(ctx)))
        .register("Reverb", |ctx| Box::new(ReverbDemo::new(ctx)))
        .register("Flange", |ctx| Box::new(FlangeDemo::new(ctx)))
        .register("Drums", |ctx| Box::new(DrumDemo::new(ctx)))
        .register("Ducking", |ctx| Box::new(DuckingDemo::new(ctx)))
        .register("Stereo", |ctx| Box::new(StereoDemo::new(ctx)))
        .register("Biquad Filter", |ctx| Box::new(FilterDemo::new(ctx)))
}

/// Held notes are scaled down a little so chords stay under full scale.
pub(crate) const NOTE_GAIN: f32 = 0.8;

/// Harmonic count of the band-limited instruments.
pub(crate) const HARMONICS: usize = 10;

/// The four instruments most demos switch between with keys 1 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrument {
    Sine,
    Saw,
    Square,
    Triangle,
}

impl Cycle for Instrument {
    const ALL: &'static [Self] = &[
        Instrument::Sine,
        Instrument::Saw,
        Instrument::Square,
        Instrument::Triangle,
    ];

    fn label(self) -> &'static str {
        self.waveform().label()
    }
}

impl Instrument {
    pub fn waveform(self) -> Waveform {
        match self {
            Instrument::Sine => Waveform::Sine,
            Instrument::Saw => Waveform::BandLimitedSaw(HARMONICS),
            Instrument::Square => Waveform::BandLimitedSquare(HARMONICS),
            Instrument::Triangle => Waveform::BandLimitedTriangle(HARMONICS),
        }
    }

    /// Keys '1' to '4'.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Char(c) => digit(c)
                .and_then(|d| d.checked_sub(1))
                .and_then(|i| Self::ALL.get(i).copied()),
            _ => None,
        }
    }
}

/// A bank entry that is either a synthesized note or a playing sample.
pub(crate) enum Playing<N = Note> {
    Note(N),
    Sample(SampleVoice),
}

impl<N> Playing<N> {
    pub(crate) fn is_sample(&self, name: &str) -> bool {
        matches!(self, Playing::Sample(voice) if voice.name() == name)
    }
}

impl<N: Voice> Voice for Playing<N> {
    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        match self {
            Playing::Note(note) => note.next_sample(sample_rate),
            Playing::Sample(sample) => sample.next_sample(sample_rate),
        }
    }

    fn frequency(&self) -> f32 {
        match self {
            Playing::Note(note) => note.frequency(),
            Playing::Sample(sample) => sample.frequency(),
        }
    }

    fn release(&mut self) {
        match self {
            Playing::Note(note) => note.release(),
            Playing::Sample(sample) => sample.release(),
        }
    }

    fn is_dead(&self) -> bool {
        match self {
            Playing::Note(note) => note.is_dead(),
            Playing::Sample(sample) => sample.is_dead(),
        }
    }

    fn envelope(&self) -> f32 {
        match self {
            Playing::Note(note) => note.envelope(),
            Playing::Sample(sample) => sample.envelope(),
        }
    }
}

/// Frequency played by a letter key, if it is one.
pub(crate) fn note_for(key: Key) -> Option<f32> {
    match key {
        Key::Char(c) => key_to_frequency(c),
        _ => None,
    }
}

/// Like `note_for`, with '-' for a rumble far below the letter rows.
pub(crate) fn note_or_low_for(key: Key) -> Option<f32> {
    match key {
        Key::Char('-') => Some(note_to_frequency(0, 0)),
        _ => note_for(key),
    }
}

/// The number key pressed, if any.
pub(crate) fn digit_for(key: Key) -> Option<usize> {
    match key {
        Key::Char(c) => digit(c),
        _ => None,
    }
}

fn digit(c: char) -> Option<usize> {
    c.to_digit(10).map(|d| d as usize)
}

pub(crate) fn on_off(on: bool) -> &'static str {
    if on {
        "On"
    } else {
        "Off"
    }
}
