//! Tremolo and vibrato.
//!
//! Tremolo wobbles the volume, vibrato wobbles the pitch, both with a sine
//! LFO. The rates are captured when the note starts, so changing them only
//! affects new notes.

use std::sync::Arc;

use crate::{
    engine::{AudioBlock, Cycle, Demo, DemoContext, Key, KeyHandler, Selector},
    synth::{Modulation, Note, NoteShape, VoiceBank},
};

use super::{digit_for, note_for, Instrument, NOTE_GAIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Speed {
    Off,
    Slow,
    Medium,
    Fast,
}

impl Cycle for Speed {
    const ALL: &'static [Self] = &[Speed::Off, Speed::Slow, Speed::Medium, Speed::Fast];

    fn label(self) -> &'static str {
        match self {
            Speed::Off => "Off",
            Speed::Slow => "Slow",
            Speed::Medium => "Medium",
            Speed::Fast => "Fast",
        }
    }
}

impl Speed {
    fn hz(self) -> f32 {
        match self {
            Speed::Off => 0.0,
            Speed::Slow => 2.8,
            Speed::Medium => 10.0,
            Speed::Fast => 20.0,
        }
    }
}

struct Shared {
    notes: VoiceBank,
    instrument: Selector<Instrument>,
    tremolo: Selector<Speed>,
    vibrato: Selector<Speed>,
}

impl Shared {
    fn report(&self) -> String {
        format!(
            "Instrument: {}  Tremolo: {}  Vibrato: {}",
            self.instrument.get().label(),
            self.tremolo.get().label(),
            self.vibrato.get().label()
        )
    }
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.instrument.reset();
        self.tremolo.reset();
        self.vibrato.reset();
        self.notes.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if pressed {
            if let Some(instrument) = Instrument::from_key(key) {
                self.instrument.set(instrument);
                return Some(self.report());
            }
            match digit_for(key) {
                Some(5) => {
                    self.tremolo.next();
                    return Some(self.report());
                }
                Some(6) => {
                    self.vibrato.next();
                    return Some(self.report());
                }
                _ => {}
            }
        }

        let frequency = note_for(key)?;
        if pressed {
            let modulation = Modulation {
                tremolo_hz: self.tremolo.get().hz(),
                vibrato_hz: self.vibrato.get().hz(),
            };
            let note = Note::new(frequency, self.instrument.get().waveform(), NoteShape::Gate)
                .with_gain(NOTE_GAIN)
                .with_modulation(modulation);
            self.notes.start(note);
        } else {
            self.notes.release(frequency);
        }
        None
    }

    fn help(&self) -> &'static str {
        "Letter keys to play notes.\n\
         1 = Sine\n2 = Band Limited Saw\n3 = Band Limited Square\n4 = Band Limited Triangle\n\
         5 = Cycle Tremolo\n6 = Cycle Vibrato"
    }
}

pub struct ModulationDemo {
    shared: Arc<Shared>,
}

impl ModulationDemo {
    pub fn new(_context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                notes: VoiceBank::new(),
                instrument: Selector::default(),
                tremolo: Selector::default(),
                vibrato: Selector::default(),
            }),
        }
    }
}

impl Demo for ModulationDemo {
    fn name(&self) -> &'static str {
        "Tremolo & Vibrato"
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_cycle_speeds() {
        let demo = ModulationDemo::new(&DemoContext::without_samples(1, 8_000.0));
        let handler = demo.key_handler();
        handler.on_key(Key::Char('5'), true);
        handler.on_key(Key::Char('6'), true);
        let report = handler.on_key(Key::Char('6'), true);
        assert_eq!(
            report.as_deref(),
            Some("Instrument: Sine  Tremolo: Slow  Vibrato: Medium")
        );

        handler.on_enter();
        assert_eq!(demo.shared.vibrato.get(), Speed::Off);
    }

    #[test]
    fn tremolo_off_halves_the_volume() {
        let mut demo = ModulationDemo::new(&DemoContext::without_samples(1, 1_000.0));
        demo.key_handler().on_key(Key::Char('a'), true);

        let mut out = vec![0.0; 1_000];
        demo.generate_samples(&mut AudioBlock::new(&mut out, 1, 1_000.0, 0));
        let peak = out[200..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak <= NOTE_GAIN * 0.5 + 1e-4, "peak {peak}");
        assert!(peak > NOTE_GAIN * 0.45, "peak {peak}");
    }
}
