//! Waveform comparison.
//!
//! The four naive waveforms next to their band-limited versions. The naive
//! saw, square and triangle have infinitely many harmonics, so everything
//! above Nyquist folds back down as aliasing; the band-limited versions
//! stop at ten harmonics and sound noticeably smoother on high notes.

use std::sync::Arc;

use crate::{
    dsp::Waveform,
    engine::{AudioBlock, Cycle, Demo, DemoContext, Key, KeyHandler, Selector},
    synth::{Note, NoteShape, VoiceBank},
};

use super::{digit_for, note_for, HARMONICS, NOTE_GAIN};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Wave(Waveform);

impl Cycle for Wave {
    const ALL: &'static [Self] = &[
        Wave(Waveform::Sine),
        Wave(Waveform::Saw),
        Wave(Waveform::Square),
        Wave(Waveform::Triangle),
        Wave(Waveform::BandLimitedSaw(HARMONICS)),
        Wave(Waveform::BandLimitedSquare(HARMONICS)),
        Wave(Waveform::BandLimitedTriangle(HARMONICS)),
        Wave(Waveform::Noise),
    ];

    fn label(self) -> &'static str {
        self.0.label()
    }
}

struct Shared {
    notes: VoiceBank,
    wave: Selector<Wave>,
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.wave.reset();
        self.notes.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if pressed {
            if let Some(wave) = digit_for(key)
                .and_then(|d| d.checked_sub(1))
                .and_then(|i| Wave::ALL.get(i))
            {
                self.wave.set(*wave);
                return Some(format!("Instrument: {}", wave.label()));
            }
        }

        let frequency = note_for(key)?;
        if pressed {
            let note = Note::new(frequency, self.wave.get().0, NoteShape::Gate).with_gain(NOTE_GAIN);
            self.notes.start(note);
        } else {
            self.notes.release(frequency);
        }
        None
    }

    fn help(&self) -> &'static str {
        "Letter keys to play notes.\n\
         1 = Sine\n2 = Saw\n3 = Square\n4 = Triangle\n\
         5 = Band Limited Saw\n6 = Band Limited Square\n7 = Band Limited Triangle\n\
         8 = Noise"
    }
}

pub struct WaveformDemo {
    shared: Arc<Shared>,
}

impl WaveformDemo {
    pub fn new(_context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                notes: VoiceBank::new(),
                wave: Selector::default(),
            }),
        }
    }
}

impl Demo for WaveformDemo {
    fn name(&self) -> &'static str {
        "Waveforms"
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
