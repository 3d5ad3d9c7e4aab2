use std::sync::Arc;

use crate::{
    dsp::{flange::FlangeEffect, reverb::MultiTapReverb},
    engine::{AudioBlock, Cycle, Demo, DemoContext, Key, KeyHandler, Selector},
    synth::{Note, NoteShape, VoiceBank},
};

use super::{digit_for, note_for, Instrument, NOTE_GAIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlangeMode {
    Off,
    Slow,
    Fast,
    SlowWithReverb,
}

impl Cycle for FlangeMode {
    const ALL: &'static [Self] = &[
        FlangeMode::Off,
        FlangeMode::Slow,
        FlangeMode::Fast,
        FlangeMode::SlowWithReverb,
    ];

    fn label(self) -> &'static str {
        match self {
            FlangeMode::Off => "None",
            FlangeMode::Slow => "Slow Flange",
            FlangeMode::Fast => "Faster Flange",
            FlangeMode::SlowWithReverb => "Slow Flange and Reverb",
        }
    }
}

impl FlangeMode {
    /// LFO rate in Hz and sweep depth in seconds.
    fn params(self) -> Option<(f32, f32)> {
        match self {
            FlangeMode::Off => None,
            FlangeMode::Slow | FlangeMode::SlowWithReverb => Some((0.25, 0.02)),
            FlangeMode::Fast => Some((1.0, 0.05)),
        }
    }
}

struct Shared {
    notes: VoiceBank,
    instrument: Selector<Instrument>,
    mode: Selector<FlangeMode>,
}

impl Shared {
    fn report(&self) -> String {
        format!(
            "Instrument: {}  Effect: {}",
            self.instrument.get().label(),
            self.mode.get().label()
        )
    }
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.instrument.reset();
        self.mode.reset();
        self.notes.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if pressed {
            if let Some(instrument) = Instrument::from_key(key) {
                self.instrument.set(instrument);
                return Some(self.report());
            }
            if digit_for(key) == Some(5) {
                self.mode.next();
                return Some(self.report());
            }
        }

        let frequency = note_for(key)?;
        if pressed {
            let note = Note::new(frequency, self.instrument.get().waveform(), NoteShape::Gate)
                .with_gain(NOTE_GAIN);
            self.notes.start(note);
        } else {
            self.notes.release(frequency);
        }
        None
    }

    fn help(&self) -> &'static str {
        "Letter keys to play notes.\n\
         1 = Sine\n2 = Band Limited Saw\n3 = Band Limited Square\n4 = Band Limited Triangle\n\
         5 = Cycle Effect"
    }
}

/// Notes through a flanger, optionally followed by reverb.
pub struct FlangeDemo {
    shared: Arc<Shared>,
    flange: FlangeEffect,
    reverb: MultiTapReverb,
    applied: FlangeMode,
    format: (usize, f32),
}

impl FlangeDemo {
    pub fn new(context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                notes: VoiceBank::new(),
                instrument: Selector::default(),
                mode: Selector::default(),
            }),
            flange: FlangeEffect::new(),
            reverb: MultiTapReverb::with_params(context.sample_rate, context.channels),
            applied: FlangeMode::Off,
            format: (context.channels, context.sample_rate),
        }
    }

    fn sync_effects(&mut self, mode: FlangeMode, channels: usize, sample_rate: f32) {
        let format = (channels, sample_rate);
        if mode == self.applied && format == self.format {
            return;
        }
        if format != self.format {
            self.reverb.set_effect_params(sample_rate, channels);
        }

        self.flange.clear_buffer();
        self.reverb.clear_buffer();
        if let Some((frequency, depth)) = mode.params() {
            self.flange
                .set_effect_params(sample_rate, channels, frequency, depth);
        }

        self.applied = mode;
        self.format = format;
    }
}

impl Demo for FlangeDemo {
    fn name(&self) -> &'static str {
        "Flange"
    }

    fn key_handler(&self) -> Arc<dyn KeyHandler> {
        self.shared.clone()
    }

    fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
        let mode = self.shared.mode.get();
        self.sync_effects(mode, block.channels, block.sample_rate);

        let frames = block.frames();
        let sample_rate = block.sample_rate;
        let flange = &mut self.flange;
        let reverb = &mut self.reverb;
        self.shared.notes.render(frames, sample_rate, |frame, value| {
            if mode == FlangeMode::Off {
                block.fill_frame(frame, value);
                return;
            }
            block.map_frame(frame, |_| {
                let flanged = flange.add_sample(value);
                if mode == FlangeMode::SlowWithReverb {
                    reverb.add_sample(flanged)
                } else {
                    flanged
                }
            });
            flange.advance_phase();
        });
    }
}
