use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    dsp::reverb::MultiTapReverb,
    engine::{AudioBlock, Cycle, Demo, DemoContext, Key, KeyHandler, Selector},
    io::SampleLibrary,
    synth::{Note, NoteShape, SampleVoice, VoiceBank},
};

use super::{digit_for, note_for, on_off, Instrument, Playing, NOTE_GAIN};

struct Shared {
    voices: VoiceBank<Playing>,
    instrument: Selector<Instrument>,
    reverb: AtomicBool,
    samples: Arc<SampleLibrary>,
}

impl Shared {
    fn report(&self) -> String {
        format!(
            "Instrument: {}  Reverb: {}",
            self.instrument.get().label(),
            on_off(self.reverb.load(Ordering::Acquire))
        )
    }

    fn play_sample(&self, name: &'static str) {
        match self.samples.get(name) {
            Some(buffer) => self
                .voices
                .start(Playing::Sample(SampleVoice::new(name, buffer).with_fade())),
            None => log::debug!("sample '{name}' not loaded"),
        }
    }
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.instrument.reset();
        self.reverb.store(false, Ordering::Release);
        self.voices.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if pressed {
            if let Some(instrument) = Instrument::from_key(key) {
                self.instrument.set(instrument);
                return Some(self.report());
            }
            match digit_for(key) {
                Some(5) => {
                    self.reverb.fetch_xor(true, Ordering::AcqRel);
                    return Some(self.report());
                }
                Some(6) => {
                    self.play_sample("cymbal");
                    return None;
                }
                Some(7) => {
                    self.play_sample("legend1");
                    return None;
                }
                _ => {}
            }
        }

        let frequency = note_for(key)?;
        if pressed {
            let note = Note::new(frequency, self.instrument.get().waveform(), NoteShape::Gate)
                .with_gain(NOTE_GAIN);
            self.voices.start(Playing::Note(note));
        } else {
            self.voices.release(frequency);
        }
        None
    }

    fn help(&self) -> &'static str {
        "Letter keys to play notes.\n\
         1 = Sine\n2 = Band Limited Saw\n3 = Band Limited Square\n4 = Band Limited Triangle\n\
         5 = Toggle Multitap Reverb\n6 = cymbals sample\n7 = voice sample"
    }
}

/// Notes and samples through the multi-tap reverb.
pub struct ReverbDemo {
    shared: Arc<Shared>,
    reverb: MultiTapReverb,
    reverb_on: bool,
    format: (usize, f32),
}

impl ReverbDemo {
    pub fn new(context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                voices: VoiceBank::new(),
                instrument: Selector::default(),
                reverb: AtomicBool::new(false),
                samples: Arc::clone(&context.samples),
            }),
            reverb: MultiTapReverb::with_params(context.sample_rate, context.channels),
            reverb_on: false,
            format: (context.channels, context.sample_rate),
        }
    }
}

impl Demo for ReverbDemo {
    fn name(&self) -> &'static str {
        "Reverb"
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

        let reverb_on = self.shared.reverb.load(Ordering::Acquire);
        if reverb_on != self.reverb_on {
            self.reverb.clear_buffer();
            self.reverb_on = reverb_on;
        }

        let frames = block.frames();
        let sample_rate = block.sample_rate;
        let reverb = &mut self.reverb;
        self.shared.voices.render(frames, sample_rate, |frame, value| {
            if reverb_on {
                block.map_frame(frame, |_| reverb.add_sample(value));
            } else {
                block.fill_frame(frame, value);
            }
        });
    }
}
