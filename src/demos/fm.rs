//! Frequency modulation.
//!
//! A modulator sine is added to the carrier's frequency. At low modulator
//! rates this is vibrato; once the modulator reaches audio rate it stops
//! sounding like a wobble and turns into new harmonics (sidebands at
//! carrier ± n × modulator). Tying the modulator frequency to the note
//! frequency keeps those sidebands harmonic, which is how FM instruments
//! get their horn, bell and metallic timbres.
//!
//! ```text
//!   modulator ──× depth──┐
//!                        ▼
//!   note freq ────────── + ──→ carrier sine ──× envelope──→ out
//! ```

use std::sync::Arc;

use crate::{
    dsp::{
        envelope::bias,
        oscillator::{advance_phase, sine_wave},
    },
    engine::{AudioBlock, Cycle, Demo, DemoContext, Key, KeyHandler, Selector},
    synth::{Lifecycle, NoteShape, Voice, VoiceBank},
};

use super::{digit_for, note_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FmMode {
    Normal,
    Speed1,
    Speed2,
    Speed3,
    Depth2,
    Depth3,
    Horn,
    Alien,
    MetalDrum,
}

impl Cycle for FmMode {
    const ALL: &'static [Self] = &[
        FmMode::Normal,
        FmMode::Speed1,
        FmMode::Speed2,
        FmMode::Speed3,
        FmMode::Depth2,
        FmMode::Depth3,
        FmMode::Horn,
        FmMode::Alien,
        FmMode::MetalDrum,
    ];

    fn label(self) -> &'static str {
        match self {
            FmMode::Normal => "Normal",
            FmMode::Speed1 => "Speed1 (10 Hz, +-10 Hz)",
            FmMode::Speed2 => "Speed2 (100 Hz, +-10 Hz)",
            FmMode::Speed3 => "Speed3 (500 Hz, +-10 Hz)",
            FmMode::Depth2 => "Depth2 (500 Hz, +-100 Hz)",
            FmMode::Depth3 => "Depth3 (500 Hz, +-500 Hz)",
            FmMode::Horn => "FM1: modulator 0.5, carrier. Horn.",
            FmMode::Alien => "FM2: modulator 0.1, modulator 2.5, carrier. Alien fx.",
            FmMode::MetalDrum => "FM3: modulator 2.37 with inverse biased bell. Metal drum.",
        }
    }
}

impl FmMode {
    fn shape(self) -> NoteShape {
        match self {
            FmMode::MetalDrum => NoteShape::Bell,
            _ => NoteShape::Gate,
        }
    }

    /// Fixed-rate modulator as (frequency, depth) in Hz.
    fn fixed_modulator(self) -> Option<(f32, f32)> {
        match self {
            FmMode::Speed1 => Some((10.0, 10.0)),
            FmMode::Speed2 => Some((100.0, 10.0)),
            FmMode::Speed3 => Some((500.0, 10.0)),
            FmMode::Depth2 => Some((500.0, 100.0)),
            FmMode::Depth3 => Some((500.0, 500.0)),
            _ => None,
        }
    }
}

/// Sample the sine at `phase`, then advance it.
#[inline]
fn advance_sine(phase: &mut f32, frequency: f32, sample_rate: f32) -> f32 {
    let value = sine_wave(*phase);
    *phase = advance_phase(*phase, frequency, sample_rate);
    value
}

/// One FM operator: a sine whose frequency is offset by `modulation`.
#[inline]
fn operator(phase: &mut f32, frequency: f32, modulation: f32, level: f32, sample_rate: f32) -> f32 {
    advance_sine(phase, frequency + modulation, sample_rate) * level
}

/// A carrier with up to two modulators.
#[derive(Debug, Clone)]
pub struct FmNote {
    frequency: f32,
    mode: FmMode,
    lifecycle: Lifecycle,
    carrier: f32,
    modulator: f32,
    modulator2: f32,
}

impl FmNote {
    fn new(frequency: f32, mode: FmMode) -> Self {
        Self {
            frequency,
            mode,
            lifecycle: Lifecycle::new(),
            carrier: 0.0,
            modulator: 0.0,
            modulator2: 0.0,
        }
    }
}

impl Voice for FmNote {
    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let (_, envelope) = self.lifecycle.step(self.mode.shape(), sample_rate);
        let f = self.frequency;

        let modulation = match self.mode {
            FmMode::Normal => 0.0,
            FmMode::Horn => advance_sine(&mut self.modulator, f * 0.5, sample_rate) * f,
            FmMode::Alien => {
                let slow = operator(&mut self.modulator2, f * 0.1, 0.0, f, sample_rate);
                operator(&mut self.modulator, f * 2.5, slow, f, sample_rate)
            }
            FmMode::MetalDrum => {
                let depth = f * bias(1.0 - envelope, 0.9);
                operator(&mut self.modulator, f * 2.37, 0.0, depth, sample_rate)
            }
            mode => {
                let (rate, depth) = mode.fixed_modulator().unwrap_or_default();
                advance_sine(&mut self.modulator, rate, sample_rate) * depth
            }
        };

        operator(&mut self.carrier, f, modulation, envelope, sample_rate)
    }

    fn frequency(&self) -> f32 {
        self.frequency
    }

    fn release(&mut self) {
        self.lifecycle.release();
    }

    fn is_dead(&self) -> bool {
        self.lifecycle.is_dead()
    }
}

struct Shared {
    notes: VoiceBank<FmNote>,
    mode: Selector<FmMode>,
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.mode.reset();
        self.notes.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if pressed {
            let step = match digit_for(key) {
                Some(1) => Some(true),
                Some(2) => Some(false),
                _ => None,
            };
            if let Some(forward) = step {
                let mode = self.mode.step(forward);
                let index = FmMode::ALL.iter().position(|&m| m == mode).unwrap_or(0);
                return Some(format!("mode = {index} {}", mode.label()));
            }
        }

        let frequency = note_for(key)?;
        if pressed {
            self.notes.start(FmNote::new(frequency, self.mode.get()));
        } else {
            self.notes.release(frequency);
        }
        None
    }

    fn help(&self) -> &'static str {
        "Letter keys to play notes.\n1 = Increase Mode\n2 = Decrease Mode"
    }
}

pub struct FmDemo {
    shared: Arc<Shared>,
}

impl FmDemo {
    pub fn new(_context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                notes: VoiceBank::new(),
                mode: Selector::default(),
            }),
        }
    }
}

impl Demo for FmDemo {
    fn name(&self) -> &'static str {
        "FM Synthesis"
    }

    fn key_handler(&self) -> Arc<dyn KeyHandler> {
        self.shared.clone()
    }

    fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
        let frames = block.frames();
        let sample_rate = block.sample_rate;
        self.shared
            .notes
            .render(frames, sample_rate, |frame, value| block.fill_frame(frame, value));
    }
}
