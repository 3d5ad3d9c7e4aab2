//! Sidechain ducking.
//!
//! A looping backing line plays under the drums. With ducking on, the
//! backing is scaled by one minus the loudest drum envelope, so every hit
//! carves a hole in the music.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    dsp::{
        envelope::{envelope_2pt, envelope_4pt},
        oscillator::{advance_phase, saw_wave_band_limited, square_wave_band_limited},
        Waveform,
    },
    engine::{AudioBlock, Demo, DemoContext, Key, KeyHandler},
    synth::{note_to_frequency, Note, NoteShape, VoiceBank},
};

use super::{digit_for, note_or_low_for, on_off};

/// Semitones above the root for each quarter second; `None` rests.
const VERSE: [Option<i32>; 8] = [Some(0), Some(2), Some(4), None, Some(0), Some(4), None, None];
const BRIDGE: [Option<i32>; 16] = [
    Some(6),
    Some(4),
    Some(2),
    None,
    Some(0),
    Some(2),
    None,
    None,
    Some(4),
    Some(2),
    Some(0),
    Some(0),
    Some(-2),
    Some(0),
    None,
    None,
];
const ROOT_OCTAVE: i32 = 2;
const ROOT_NOTE: i32 = 6;
/// Quarter seconds before the backing repeats: the verse twice, then the bridge.
const LOOP_STEPS: usize = 32;

/// Frequency of the backing line at quarter second `step`, 0 for a rest.
fn backing_frequency(step: usize) -> f32 {
    let step = step % LOOP_STEPS;
    let semitones = if step < 16 {
        VERSE[step % VERSE.len()]
    } else {
        BRIDGE[step % BRIDGE.len()]
    };
    semitones.map_or(0.0, |s| note_to_frequency(ROOT_OCTAVE, ROOT_NOTE + s))
}

/// Audio-thread state of the backing line.
#[derive(Debug, Default)]
struct Backing {
    phase: f32,
    age: usize,
}

impl Backing {
    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let seconds = self.age as f32 / sample_rate;
        self.age += 1;
        let quarters = seconds * 4.0;
        let frequency = backing_frequency(quarters as usize);

        let value = saw_wave_band_limited(self.phase, 3) * 0.3
            + square_wave_band_limited(self.phase, 5) * 0.7;
        self.phase = advance_phase(self.phase, frequency, sample_rate);

        let fade_in = envelope_2pt(seconds, (0.0, 0.0), (0.1, 0.5));
        let note = envelope_4pt(
            quarters.fract(),
            (0.0, 0.0),
            (0.1, 1.0),
            (0.9, 1.0),
            (1.0, 0.0),
        );
        value * fade_in * note
    }
}

struct Shared {
    drums: VoiceBank,
    music: AtomicBool,
    ducking: AtomicBool,
    drums_on: AtomicBool,
}

impl Shared {
    fn report(&self) -> String {
        format!(
            "Music: {}  Ducking: {}  Drums: {}",
            on_off(self.music.load(Ordering::Acquire)),
            on_off(self.ducking.load(Ordering::Acquire)),
            on_off(self.drums_on.load(Ordering::Acquire))
        )
    }
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.music.store(false, Ordering::Release);
        self.ducking.store(false, Ordering::Release);
        self.drums_on.store(true, Ordering::Release);
        self.drums.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if !pressed {
            return None;
        }

        let toggle = match digit_for(key) {
            Some(1) => Some(&self.music),
            Some(2) => Some(&self.ducking),
            Some(3) => Some(&self.drums_on),
            _ => None,
        };
        if let Some(flag) = toggle {
            flag.fetch_xor(true, Ordering::AcqRel);
            return Some(self.report());
        }

        if key == Key::Char(' ') {
            self.drums.start(Note::cymbal());
            return None;
        }

        let frequency = note_or_low_for(key)?;
        let drum = Note::new(frequency, Waveform::Sine, NoteShape::Drum { pop: false })
            .with_frequency_decay();
        self.drums.start(drum);
        None
    }

    fn help(&self) -> &'static str {
        "Letter keys to play drums, space to play cymbals.\n\
         - = very low drum\n\
         1 = toggle music\n2 = toggle ducking\n3 = toggle drums"
    }
}

/// Drums over a backing line that can duck out of their way.
pub struct DuckingDemo {
    shared: Arc<Shared>,
    backing: Backing,
    music_on: bool,
}

impl DuckingDemo {
    pub fn new(_context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                drums: VoiceBank::new(),
                music: AtomicBool::new(false),
                ducking: AtomicBool::new(false),
                drums_on: AtomicBool::new(true),
            }),
            backing: Backing::default(),
            music_on: false,
        }
    }
}

impl Demo for DuckingDemo {
    fn name(&self) -> &'static str {
        "Ducking"
    }

    fn key_handler(&self) -> Arc<dyn KeyHandler> {
        self.shared.clone()
    }

    fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
        let music_on = self.shared.music.load(Ordering::Acquire);
        if music_on != self.music_on {
            // the backing starts from the top each time it comes back
            self.backing = Backing::default();
            self.music_on = music_on;
        }
        let ducking = self.shared.ducking.load(Ordering::Acquire);
        let drums_on = self.shared.drums_on.load(Ordering::Acquire);

        let frames = block.frames();
        let sample_rate = block.sample_rate;
        let backing = &mut self.backing;
        self.shared
            .drums
            .render_enveloped(frames, sample_rate, |frame, drums, envelope| {
                let drums = if drums_on { drums } else { 0.0 };
                let mut music = if music_on {
                    backing.next_sample(sample_rate)
                } else {
                    0.0
                };
                if ducking {
                    music *= 1.0 - envelope;
                }
                block.fill_frame(frame, drums + music);
            });
    }
}
