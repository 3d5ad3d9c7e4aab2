use std::sync::Arc;

use crate::{
    dsp::Waveform,
    engine::{AudioBlock, Cycle, Demo, DemoContext, Key, KeyHandler, Selector},
    synth::{Note, NoteShape, Voice, VoiceBank},
};

use super::{digit_for, note_for};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shape(NoteShape);

impl Cycle for Shape {
    const ALL: &'static [Self] = &[
        Shape(NoteShape::Minimal),
        Shape(NoteShape::Bell),
        Shape(NoteShape::ReverseBell),
        Shape(NoteShape::Sustain),
    ];

    fn label(self) -> &'static str {
        self.0.label()
    }
}

struct Shared {
    notes: VoiceBank,
    shape: Selector<Shape>,
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.shape.reset();
        self.notes.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if pressed {
            if let Some(shape) = digit_for(key)
                .and_then(|d| d.checked_sub(1))
                .and_then(|i| Shape::ALL.get(i))
            {
                self.shape.set(*shape);
                return Some(format!("Envelope: {}", shape.label()));
            }
        }

        let frequency = note_for(key)?;
        if pressed {
            self.notes
                .start(Note::new(frequency, Waveform::Sine, self.shape.get().0));
        } else {
            // only the flute holds; the rest ignore key up
            self.notes.release_where(|note| {
                note.shape() == NoteShape::Sustain && note.frequency() == frequency
            });
        }
        None
    }

    fn help(&self) -> &'static str {
        "Letter keys to play notes.\n1 = minimal\n2 = bell\n3 = reverse bell\n4 = flute"
    }
}

/// Sine notes with a choice of envelope.
pub struct EnvelopeDemo {
    shared: Arc<Shared>,
}

impl EnvelopeDemo {
    pub fn new(_context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                notes: VoiceBank::new(),
                shape: Selector::default(),
            }),
        }
    }
}

impl Demo for EnvelopeDemo {
    fn name(&self) -> &'static str {
        "Envelopes"
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
