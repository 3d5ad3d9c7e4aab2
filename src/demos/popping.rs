//! Where clicks come from and how envelopes remove them.
//!
//! A two second melody is played three ways: computing the sine straight
//! from time (the wave jumps at every note change), with a running phase
//! and short fades at both ends, and sliding between notes. Keys 4 and 5
//! play a sample with and without a fade.

use std::sync::Arc;

use crate::{
    dsp::{
        envelope::envelope_4pt,
        oscillator::{advance_phase, sine_wave},
    },
    engine::{AudioBlock, Cycle, Demo, DemoContext, Key, KeyHandler, Selector},
    io::SampleLibrary,
    synth::{note_to_frequency, Glide, SampleVoice, Voice},
};

use super::digit_for;

/// Semitones above A3, one per quarter second.
const MELODY: [i32; 8] = [0, 1, 3, 1, 0, 1, 5, 1];
const STEP_SECONDS: f32 = 0.25;
const FADE_SECONDS: f32 = 0.05;
const SAMPLE_FADE_SECONDS: f32 = 0.03;
const SAMPLE: &str = "legend1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PopMode {
    Silence,
    PoppingNotes,
    Notes,
    SlidingNotes,
    PoppingSample,
    Sample,
}

impl Cycle for PopMode {
    const ALL: &'static [Self] = &[
        PopMode::Silence,
        PopMode::PoppingNotes,
        PopMode::Notes,
        PopMode::SlidingNotes,
        PopMode::PoppingSample,
        PopMode::Sample,
    ];

    fn label(self) -> &'static str {
        match self {
            PopMode::Silence => "Silence",
            PopMode::PoppingNotes => "Popping Notes",
            PopMode::Notes => "Notes Without Popping",
            PopMode::SlidingNotes => "Sliding Notes",
            PopMode::PoppingSample => "Popping Sample",
            PopMode::Sample => "Sample Without Popping",
        }
    }
}

impl PopMode {
    /// Melody frequency `seconds` into the phrase, or `None` once it is over.
    fn frequency(self, seconds: f32) -> Option<f32> {
        let step = (seconds / STEP_SECONDS) as usize;
        let current = note_to_frequency(3, *MELODY.get(step)?);
        if self != PopMode::SlidingNotes {
            return Some(current);
        }
        let next = note_to_frequency(3, MELODY[(step + 1) % MELODY.len()]);
        let into_step = seconds - step as f32 * STEP_SECONDS;
        Some(Glide::new(next, STEP_SECONDS).frequency_at(current, into_step))
    }

    fn sample_fade(self) -> Option<Option<f32>> {
        match self {
            PopMode::PoppingSample => Some(None),
            PopMode::Sample => Some(Some(SAMPLE_FADE_SECONDS)),
            _ => None,
        }
    }
}

struct Shared {
    mode: Selector<PopMode>,
    samples: Arc<SampleLibrary>,
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.mode.reset();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if !pressed {
            return None;
        }
        let mode = match digit_for(key)? {
            0 => return None,
            digit => *PopMode::ALL.get(digit)?,
        };
        self.mode.set(mode);
        Some(mode.label().to_string())
    }

    fn help(&self) -> &'static str {
        "1 = notes with pop\n2 = notes without pop\n3 = note slide without pop\n\
         4 = sample with pop\n5 = sample without pop"
    }
}

/// A short melody and a sample, with and without fades.
pub struct PoppingDemo {
    shared: Arc<Shared>,
    mode: PopMode,
    phase: f32,
    age: usize,
    sample: Option<SampleVoice>,
}

impl PoppingDemo {
    pub fn new(context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                mode: Selector::default(),
                samples: Arc::clone(&context.samples),
            }),
            mode: PopMode::Silence,
            phase: 0.0,
            age: 0,
            sample: None,
        }
    }

    fn restart(&mut self, mode: PopMode) {
        self.mode = mode;
        self.phase = 0.0;
        self.age = 0;
        self.sample = mode.sample_fade().and_then(|fade| {
            let buffer = self.shared.samples.get(SAMPLE)?;
            let voice = SampleVoice::new(SAMPLE, buffer);
            Some(match fade {
                Some(seconds) => voice.with_fade_time(seconds),
                None => voice,
            })
        });
        if mode.sample_fade().is_some() && self.sample.is_none() {
            log::debug!("sample '{SAMPLE}' not loaded");
            self.mode = PopMode::Silence;
            self.shared.mode.set(PopMode::Silence);
        }
    }

    fn next_note(&mut self, sample_rate: f32) -> Option<f32> {
        let seconds = self.age as f32 / sample_rate;
        self.age += 1;
        let frequency = self.mode.frequency(seconds)?;

        let value = if self.mode == PopMode::PoppingNotes {
            // straight from time: the wave restarts at every note change
            sine_wave(seconds * frequency)
        } else {
            let fade = envelope_4pt(
                seconds,
                (0.0, 0.0),
                (FADE_SECONDS, 1.0),
                (2.0 - FADE_SECONDS, 1.0),
                (2.0, 0.0),
            );
            let value = sine_wave(self.phase) * fade;
            self.phase = advance_phase(self.phase, frequency, sample_rate);
            value
        };
        Some(value)
    }
}

impl Demo for PoppingDemo {
    fn name(&self) -> &'static str {
        "Popping"
    }

    fn key_handler(&self) -> Arc<dyn KeyHandler> {
        self.shared.clone()
    }

    fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
        let mode = self.shared.mode.get();
        if mode != self.mode {
            self.restart(mode);
        }

        let sample_rate = block.sample_rate;
        let mut finished = false;
        for frame in 0..block.frames() {
            let value = if self.mode == PopMode::Silence {
                0.0
            } else if let Some(voice) = self.sample.as_mut() {
                let value = voice.next_sample(sample_rate);
                finished |= voice.is_dead();
                value
            } else if let Some(value) = self.next_note(sample_rate) {
                value
            } else {
                finished = true;
                0.0
            };
            block.fill_frame(frame, value);
        }

        if finished && self.shared.mode.get() == self.mode {
            self.shared.mode.set(PopMode::Silence);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SampleBuffer;

    fn render(demo: &mut PoppingDemo, frames: usize, sample_rate: f32) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        demo.generate_samples(&mut AudioBlock::new(&mut out, 1, sample_rate, 0));
        out
    }

    fn largest_step(out: &[f32]) -> f32 {
        out.windows(2).map(|w| (w[1] - w[0]).abs()).fold(0.0, f32::max)
    }

    #[test]
    fn number_keys_pick_the_mode() {
        let demo = PoppingDemo::new(&DemoContext::without_samples(1, 1_000.0));
        let handler = demo.key_handler();
        assert_eq!(
            handler.on_key(Key::Char('3'), true).as_deref(),
            Some("Sliding Notes")
        );
        assert_eq!(handler.on_key(Key::Char('0'), true), None);
        assert_eq!(handler.on_key(Key::Char('6'), true), None);
        assert_eq!(handler.on_key(Key::Char('a'), true), None);
        assert_eq!(demo.shared.mode.get(), PopMode::SlidingNotes);

        handler.on_enter();
        assert_eq!(demo.shared.mode.get(), PopMode::Silence);
    }

    #[test]
    fn notes_from_time_jump_at_note_changes() {
        let sr = 8_000.0;
        let mut popping = PoppingDemo::new(&DemoContext::without_samples(1, sr));
        popping.key_handler().on_key(Key::Char('1'), true);
        let popped = render(&mut popping, 16_000, sr);

        let mut smooth = PoppingDemo::new(&DemoContext::without_samples(1, sr));
        smooth.key_handler().on_key(Key::Char('2'), true);
        let faded = render(&mut smooth, 16_000, sr);

        assert!(largest_step(&popped) > 0.5);
        // a running phase never moves further than one sample of the top note
        assert!(largest_step(&faded) < 0.3);
        assert_eq!(faded[0], 0.0);
        assert!(faded[15_999].abs() < 0.01);
    }

    #[test]
    fn sliding_notes_pass_between_the_melody() {
        let a = note_to_frequency(3, 0);
        let a_sharp = note_to_frequency(3, 1);
        assert_eq!(PopMode::Notes.frequency(0.125), Some(a));
        let halfway = PopMode::SlidingNotes.frequency(0.125).unwrap();
        assert!((halfway - (a + a_sharp) / 2.0).abs() < 0.01);

        // the last step slides back to the first note
        let end = PopMode::SlidingNotes.frequency(1.999).unwrap();
        assert!((end - a).abs() < 0.2);
        assert_eq!(PopMode::SlidingNotes.frequency(2.0), None);
    }

    #[test]
    fn melody_returns_to_silence_after_two_seconds() {
        let sr = 1_000.0;
        let mut demo = PoppingDemo::new(&DemoContext::without_samples(1, sr));
        demo.key_handler().on_key(Key::Char('2'), true);
        render(&mut demo, 1_500, sr);
        assert_eq!(demo.shared.mode.get(), PopMode::Notes);

        render(&mut demo, 1_000, sr);
        assert_eq!(demo.shared.mode.get(), PopMode::Silence);
        assert!(render(&mut demo, 100, sr).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn sample_fade_hides_the_click() {
        let sr = 1_000.0;
        let mut library = SampleLibrary::new();
        library.insert(SAMPLE, SampleBuffer::new(vec![1.0; 200], 1, sr));
        let context = DemoContext::new(1, sr, Arc::new(library));

        let mut demo = PoppingDemo::new(&context);
        let handler = demo.key_handler();
        handler.on_key(Key::Char('4'), true);
        let popped = render(&mut demo, 100, sr);
        assert_eq!(popped[0], 1.0);

        handler.on_key(Key::Char('5'), true);
        let faded = render(&mut demo, 300, sr);
        assert_eq!(faded[0], 0.0);
        assert_eq!(faded[100], 1.0);
        // played out: back to silence
        assert_eq!(demo.shared.mode.get(), PopMode::Silence);
    }

    #[test]
    fn missing_sample_falls_back_to_silence() {
        let mut demo = PoppingDemo::new(&DemoContext::without_samples(1, 1_000.0));
        demo.key_handler().on_key(Key::Char('4'), true);
        assert!(render(&mut demo, 100, 1_000.0).iter().all(|&s| s == 0.0));
        assert_eq!(demo.shared.mode.get(), PopMode::Silence);
    }
}
