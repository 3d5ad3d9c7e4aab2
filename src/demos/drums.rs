//! Drums from a sine wave.
//!
//! Each step adds one ingredient: a percussive envelope, a falling pitch,
//! an attack that starts at full volume (the "pop"), and finally reverb.
//! Space plays a noise cymbal.

use std::sync::Arc;

use crate::{
    dsp::{reverb::MultiTapReverb, Waveform},
    engine::{AudioBlock, Cycle, Demo, DemoContext, Key, KeyHandler, Selector},
    synth::{Note, NoteShape, VoiceBank},
};

use super::{digit_for, note_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrumMode {
    Wave,
    Envelope,
    Decay,
    Pop,
    Reverb,
}

impl Cycle for DrumMode {
    const ALL: &'static [Self] = &[
        DrumMode::Wave,
        DrumMode::Envelope,
        DrumMode::Decay,
        DrumMode::Pop,
        DrumMode::Reverb,
    ];

    fn label(self) -> &'static str {
        match self {
            DrumMode::Wave => "Wave",
            DrumMode::Envelope => "Wave + Envelope",
            DrumMode::Decay => "Wave + Envelope + Frequency Decay",
            DrumMode::Pop => "Wave + Envelope + Frequency Decay + Pop",
            DrumMode::Reverb => "Wave + Envelope + Frequency Decay + Pop + Reverb",
        }
    }
}

impl DrumMode {
    fn drum(self, frequency: f32) -> Note {
        match self {
            DrumMode::Wave => Note::new(frequency, Waveform::Sine, NoteShape::Minimal),
            DrumMode::Envelope => {
                Note::new(frequency, Waveform::Sine, NoteShape::Drum { pop: false })
            }
            DrumMode::Decay => {
                Note::new(frequency, Waveform::Sine, NoteShape::Drum { pop: false })
                    .with_frequency_decay()
            }
            DrumMode::Pop | DrumMode::Reverb => {
                Note::new(frequency, Waveform::Sine, NoteShape::Drum { pop: true })
                    .with_frequency_decay()
            }
        }
    }

    fn cymbal(self) -> Note {
        match self {
            DrumMode::Wave => Note::new(0.0, Waveform::Noise, NoteShape::Minimal).with_gain(0.25),
            _ => Note::cymbal(),
        }
    }

    fn reverb(self) -> bool {
        self == DrumMode::Reverb
    }
}

struct Shared {
    notes: VoiceBank,
    mode: Selector<DrumMode>,
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.mode.reset();
        self.notes.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        // drums play out their envelope, releases mean nothing here
        if !pressed {
            return None;
        }

        if digit_for(key) == Some(1) {
            let mode = self.mode.next();
            return Some(format!("Drum: {}", mode.label()));
        }

        let mode = self.mode.get();
        if key == Key::Char(' ') {
            self.notes.start(mode.cymbal());
            return None;
        }

        let frequency = note_for(key)?;
        self.notes.start(mode.drum(frequency));
        None
    }

    fn help(&self) -> &'static str {
        "Letter keys to play drums.\nSpace = cymbal\n1 = Cycle Drum Type"
    }
}

/// Sine drums built up one ingredient at a time.
pub struct DrumDemo {
    shared: Arc<Shared>,
    reverb: MultiTapReverb,
    reverb_on: bool,
    format: (usize, f32),
}

impl DrumDemo {
    pub fn new(context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                notes: VoiceBank::new(),
                mode: Selector::default(),
            }),
            reverb: MultiTapReverb::with_params(context.sample_rate, context.channels),
            reverb_on: false,
            format: (context.channels, context.sample_rate),
        }
    }
}

impl Demo for DrumDemo {
    fn name(&self) -> &'static str {
        "Drums"
    }

    fn key_handler(&self) -> Arc<dyn KeyHandler> {
        self.shared.clone()
    }

    fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
        let format = (block.channels, block.sample_rate);
        if format != self.format {
            self.reverb.set_effect_params(block.sample_rate, block.channels);
            self.format = format;
        }

        let reverb_on = self.shared.mode.get().reverb();
        if reverb_on != self.reverb_on {
            self.reverb.clear_buffer();
            self.reverb_on = reverb_on;
        }

        let frames = block.frames();
        let sample_rate = block.sample_rate;
        let reverb = &mut self.reverb;
        self.shared.notes.render(frames, sample_rate, |frame, value| {
            if reverb_on {
                block.map_frame(frame, |_| reverb.add_sample(value));
            } else {
                block.fill_frame(frame, value);
            }
        });
    }
}
