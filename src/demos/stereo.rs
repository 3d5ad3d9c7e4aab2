//! Stereo placement.
//!
//! Everything is generated in mono and only split into left and right at the
//! end. Rotation pans the sound around the listener with a slow sine and
//! cosine pair; the ping-pong delay bounces echoes between the speakers.
//!
//! ```text
//!                     ┌─ × (sin(t·0.25·2π)·0.45 + 0.55) ──(+ echo L)──→ even channels
//!   notes + samples ──┤
//!                     └─ × (cos(t·0.25·2π)·0.45 + 0.55) ──(+ echo R)──→ odd channels
//! ```

use std::{
    f32::consts::TAU,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::{
    dsp::{
        envelope::envelope_4pt,
        oscillator::{advance_phase, sine_wave},
        pingpong::PingPongDelay,
    },
    engine::{AudioBlock, Demo, DemoContext, Key, KeyHandler},
    io::SampleLibrary,
    synth::{SampleVoice, Voice, VoiceBank},
};

use super::{digit_for, note_for, on_off, Playing};

const DECAY_SECONDS: f32 = 1.5;
const HARMONICS: usize = 10;
const HARMONIC_GAIN: f32 = 0.25;
const SAMPLE_GAIN: f32 = 2.0;

const ROTATION_HZ: f32 = 0.25;
const PING_PONG_SECONDS: f32 = 0.33;
const PING_PONG_FEEDBACK: f32 = 0.0625;

/// A plucked tone made of ten sine harmonics. Harmonic `k` runs its
/// envelope `k` times faster, so the tone starts bright and mellows out.
#[derive(Debug, Clone)]
struct Harmonics {
    frequency: f32,
    phase: f32,
    age: usize,
    dead: bool,
}

impl Harmonics {
    fn new(frequency: f32) -> Self {
        Self {
            frequency,
            phase: 0.0,
            age: 0,
            dead: false,
        }
    }
}

impl Voice for Harmonics {
    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let seconds = self.age as f32 / sample_rate;
        self.age += 1;
        if seconds > DECAY_SECONDS {
            self.dead = true;
            return 0.0;
        }

        let value: f32 = (1..=HARMONICS)
            .map(|k| {
                let k = k as f32;
                let level = envelope_4pt(
                    seconds * k,
                    (0.0, 0.0),
                    (DECAY_SECONDS * 0.05, 1.0),
                    (DECAY_SECONDS * 0.10, 0.6),
                    (DECAY_SECONDS, 0.0),
                );
                sine_wave((self.phase * k).fract()) * level
            })
            .sum();

        self.phase = advance_phase(self.phase, self.frequency, sample_rate);
        value * HARMONIC_GAIN
    }

    fn frequency(&self) -> f32 {
        self.frequency
    }

    // plays out its decay regardless of the key
    fn release(&mut self) {}

    fn is_dead(&self) -> bool {
        self.dead
    }
}

struct Shared {
    voices: VoiceBank<Playing<Harmonics>>,
    rotate: AtomicBool,
    ping_pong: AtomicBool,
    samples: Arc<SampleLibrary>,
}

impl Shared {
    fn report(&self) -> String {
        format!(
            "Rotate Sound: {}, Ping Pong Delay: {}",
            on_off(self.rotate.load(Ordering::Acquire)),
            on_off(self.ping_pong.load(Ordering::Acquire))
        )
    }

    /// Start `name` from the top, or stop it if it is already playing.
    fn toggle_sample(&self, name: &'static str) {
        if self.voices.any(|voice| voice.is_sample(name) && !voice.is_dead()) {
            self.voices.release_where(|voice| voice.is_sample(name));
            return;
        }
        match self.samples.get(name) {
            Some(buffer) => self.voices.start(Playing::Sample(
                SampleVoice::new(name, buffer).with_gain(SAMPLE_GAIN),
            )),
            None => log::debug!("sample '{name}' not loaded"),
        }
    }
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.rotate.store(false, Ordering::Release);
        self.ping_pong.store(false, Ordering::Release);
        self.voices.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if !pressed {
            return None;
        }

        match digit_for(key) {
            Some(1) => {
                self.rotate.fetch_xor(true, Ordering::AcqRel);
                return Some(self.report());
            }
            Some(2) => {
                self.ping_pong.fetch_xor(true, Ordering::AcqRel);
                return Some(self.report());
            }
            Some(3) => {
                self.toggle_sample("cymbal");
                return None;
            }
            Some(4) => {
                self.toggle_sample("legend2");
                return None;
            }
            _ => {}
        }

        let frequency = note_for(key)?;
        self.voices.start(Playing::Note(Harmonics::new(frequency)));
        None
    }

    fn help(&self) -> &'static str {
        "Letter keys to play notes.\n\
         1 = Toggle sound rotation\n2 = Toggle ping pong delay\n\
         3 = Cymbals Sample\n4 = Voice Sample"
    }
}

/// Mono voices spread over two speakers.
pub struct StereoDemo {
    shared: Arc<Shared>,
    delay: PingPongDelay,
    delay_on: bool,
    sample_rate: f32,
}

impl StereoDemo {
    pub fn new(context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                voices: VoiceBank::new(),
                rotate: AtomicBool::new(false),
                ping_pong: AtomicBool::new(false),
                samples: Arc::clone(&context.samples),
            }),
            delay: PingPongDelay::new(),
            delay_on: false,
            sample_rate: context.sample_rate,
        }
    }
}

impl Demo for StereoDemo {
    fn name(&self) -> &'static str {
        "Stereo"
    }

    fn key_handler(&self) -> Arc<dyn KeyHandler> {
        self.shared.clone()
    }

    fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
        let delay_on = self.shared.ping_pong.load(Ordering::Acquire);
        if delay_on != self.delay_on || block.sample_rate != self.sample_rate {
            self.delay
                .set_effect_params(PING_PONG_SECONDS, block.sample_rate, PING_PONG_FEEDBACK);
            self.delay_on = delay_on;
            self.sample_rate = block.sample_rate;
        }
        let rotate = self.shared.rotate.load(Ordering::Acquire);
        let use_delay = delay_on && block.channels >= 2;

        let frames = block.frames();
        let sample_rate = block.sample_rate;
        let delay = &mut self.delay;
        self.shared.voices.render(frames, sample_rate, |frame, mono| {
            let (mut left, mut right) = (mono, mono);

            if rotate {
                let angle = block.time_at(frame) * ROTATION_HZ * TAU;
                left *= angle.sin() * 0.45 + 0.55;
                right *= angle.cos() * 0.45 + 0.55;
            }

            if use_delay {
                let (echo_left, echo_right) = delay.add_sample(mono);
                left += echo_left;
                right += echo_right;
            }

            block.map_frame(frame, |channel| if channel % 2 == 0 { left } else { right });
        });
    }
}
