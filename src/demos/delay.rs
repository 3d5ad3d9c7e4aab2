use std::sync::Arc;

use crate::{
    dsp::delay::DelayEffect,
    engine::{AudioBlock, Cycle, Demo, DemoContext, Key, KeyHandler, Selector},
    synth::{Note, NoteShape, VoiceBank},
};

use super::{digit_for, note_for, Instrument, NOTE_GAIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DelayMode {
    Off,
    Short,
    Medium,
    Long,
}

impl Cycle for DelayMode {
    const ALL: &'static [Self] = &[
        DelayMode::Off,
        DelayMode::Short,
        DelayMode::Medium,
        DelayMode::Long,
    ];

    fn label(self) -> &'static str {
        match self {
            DelayMode::Off => "None",
            DelayMode::Short => "0.25s, feedback 0.35",
            DelayMode::Medium => "0.66s, feedback 0.4",
            DelayMode::Long => "1.0s, feedback 0.33",
        }
    }
}

impl DelayMode {
    /// (delay seconds, feedback)
    fn params(self) -> (f32, f32) {
        match self {
            DelayMode::Off => (0.0, 0.0),
            DelayMode::Short => (0.25, 0.35),
            DelayMode::Medium => (0.66, 0.4),
            DelayMode::Long => (1.0, 0.33),
        }
    }
}

struct Shared {
    notes: VoiceBank,
    instrument: Selector<Instrument>,
    delay: Selector<DelayMode>,
}

impl Shared {
    fn report(&self) -> String {
        format!(
            "Instrument: {}  Delay: {}",
            self.instrument.get().label(),
            self.delay.get().label()
        )
    }
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.instrument.reset();
        self.delay.reset();
        self.notes.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if pressed {
            if let Some(instrument) = Instrument::from_key(key) {
                self.instrument.set(instrument);
                return Some(self.report());
            }
            if digit_for(key) == Some(5) {
                self.delay.next();
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
         5 = Cycle Delay"
    }
}

/// Notes through a feedback delay.
pub struct DelayDemo {
    shared: Arc<Shared>,
    delay: DelayEffect,
    applied: DelayMode,
    channels: usize,
    sample_rate: f32,
}

impl DelayDemo {
    pub fn new(context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                notes: VoiceBank::new(),
                instrument: Selector::default(),
                delay: Selector::default(),
            }),
            delay: DelayEffect::new(),
            applied: DelayMode::Off,
            channels: context.channels,
            sample_rate: context.sample_rate,
        }
    }

    /// Resize the delay line if the mode or stream format changed.
    fn sync_effect(&mut self, mode: DelayMode, channels: usize, sample_rate: f32) {
        if mode == self.applied && channels == self.channels && sample_rate == self.sample_rate {
            return;
        }
        let (seconds, feedback) = mode.params();
        self.delay
            .set_effect_params(seconds, sample_rate, channels, feedback);
        self.applied = mode;
        self.channels = channels;
        self.sample_rate = sample_rate;
    }
}

impl Demo for DelayDemo {
    fn name(&self) -> &'static str {
        "Delay"
    }

    fn key_handler(&self) -> Arc<dyn KeyHandler> {
        self.shared.clone()
    }

    fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
        self.sync_effect(self.shared.delay.get(), block.channels, block.sample_rate);

        let frames = block.frames();
        let sample_rate = block.sample_rate;
        let delay = &mut self.delay;
        self.shared.notes.render(frames, sample_rate, |frame, value| {
            block.map_frame(frame, |_| delay.add_sample(value));
        });
    }
}
