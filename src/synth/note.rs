use crate::dsp::{
    envelope::{envelope, EnvelopePoint},
    interpolate::lerp,
    oscillator::{advance_phase, sine_wave, Waveform},
};

use super::Voice;

/*
Note Lifecycle
==============

Every note is born on key down, ages by one sample each time the audio
callback asks it for a value, and is removed after the buffer in which it
dies. What "dies" means depends on the envelope shape:

  one-shot shapes      Minimal, Bell, ReverseBell, Drum, Cymbal
                       Die when their age passes the last envelope point.
                       Key release is ignored.

  held shapes          Sustain, Gate
                       Play an intro envelope, then hold its final level
                       for as long as the key is down. On key up the note
                       only *wants* to release; the release starts once
                       the intro has finished, so a quick tap still gets
                       its full attack. The note dies when the release
                       envelope completes.

   key down        key up (wants release)
      │                │
      ▼                ▼
      ╱▔▔▔╲___________ ┊ ╲
     ╱  intro   hold   ┊  ╲ release
    ╱                  ┊   ╲
                           └─ dead

The release start is remembered as a sample index (`release_age`) so the
release envelope is timed from the exact sample it began.
*/

const MINIMAL: [EnvelopePoint; 4] = [
    EnvelopePoint::new(0.0, 0.0),
    EnvelopePoint::new(0.05, 1.0),
    EnvelopePoint::new(0.2, 1.0),
    EnvelopePoint::new(0.25, 0.0),
];

const BELL: [EnvelopePoint; 3] = [
    EnvelopePoint::new(0.0, 0.0),
    EnvelopePoint::new(0.003, 1.0),
    EnvelopePoint::new(1.0, 0.0),
];

const REVERSE_BELL: [EnvelopePoint; 3] = [
    EnvelopePoint::new(0.0, 0.0),
    EnvelopePoint::new(0.997, 1.0),
    EnvelopePoint::new(1.0, 0.0),
];

const SUSTAIN_INTRO: [EnvelopePoint; 3] = [
    EnvelopePoint::new(0.0, 0.0),
    EnvelopePoint::new(0.1, 1.0),
    EnvelopePoint::new(0.15, 0.4),
];

const SUSTAIN_RELEASE: [EnvelopePoint; 2] = [
    EnvelopePoint::new(0.0, 0.4),
    EnvelopePoint::new(0.1, 0.0),
];

const GATE_INTRO: [EnvelopePoint; 2] = [
    EnvelopePoint::new(0.0, 0.0),
    EnvelopePoint::new(0.1, 1.0),
];

const GATE_RELEASE: [EnvelopePoint; 2] = [
    EnvelopePoint::new(0.0, 1.0),
    EnvelopePoint::new(0.1, 0.0),
];

const DRUM: [EnvelopePoint; 4] = [
    EnvelopePoint::new(0.0, 0.0),
    EnvelopePoint::new(0.01, 1.0),
    EnvelopePoint::new(0.02, 1.0),
    EnvelopePoint::new(0.195, 0.0),
];

const DRUM_POP: [EnvelopePoint; 4] = [
    EnvelopePoint::new(0.0, 1.0),
    EnvelopePoint::new(0.01, 1.0),
    EnvelopePoint::new(0.02, 1.0),
    EnvelopePoint::new(0.195, 0.0),
];

const CYMBAL: [EnvelopePoint; 5] = [
    EnvelopePoint::new(0.0, 0.0),
    EnvelopePoint::new(0.01, 1.0),
    EnvelopePoint::new(0.02, 1.0),
    EnvelopePoint::new(0.04, 0.2),
    EnvelopePoint::new(0.215, 0.0),
];

/// Drum pitch starts falling once the hold ends.
const DRUM_DECAY_START: f32 = 0.02;
const DRUM_DECAY_TIME: f32 = 0.175;
const DRUM_DECAY_FLOOR: f32 = 0.2;

/// Linear pitch sweep from a note's start frequency to `target`.
///
/// The sweep begins `delay` seconds into the note and lasts `duration`
/// seconds, then holds `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glide {
    pub target: f32,
    pub delay: f32,
    pub duration: f32,
}

impl Glide {
    pub fn new(target: f32, duration: f32) -> Self {
        Self {
            target,
            delay: 0.0,
            duration,
        }
    }

    pub fn after(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Frequency `seconds` into a note that started at `from`.
    #[inline]
    pub fn frequency_at(&self, from: f32, seconds: f32) -> f32 {
        let elapsed = seconds - self.delay;
        if elapsed <= 0.0 {
            from
        } else if elapsed >= self.duration {
            self.target
        } else {
            lerp(from, self.target, elapsed / self.duration)
        }
    }
}

/// Envelope shape, which also decides how a note ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteShape {
    /// 50 ms fade in, 150 ms hold, 50 ms fade out.
    Minimal,
    /// Instant attack, one second linear decay.
    Bell,
    /// One second swell, instant cut.
    ReverseBell,
    /// Attack to full, decay to 0.4 and hold until release (ADSR).
    Sustain,
    /// 100 ms fade in, hold, 100 ms fade out after release.
    Gate,
    /// Short attack and hold then a 175 ms decay. `pop` skips the attack.
    Drum { pop: bool },
    /// Drum-like envelope with a quiet tail, for noise hits.
    Cymbal,
}

impl NoteShape {
    pub fn label(self) -> &'static str {
        match self {
            NoteShape::Minimal => "Minimal",
            NoteShape::Bell => "Bell",
            NoteShape::ReverseBell => "Reverse Bell",
            NoteShape::Sustain => "Flute",
            NoteShape::Gate => "Gate",
            NoteShape::Drum { pop: false } => "Drum",
            NoteShape::Drum { pop: true } => "Drum (pop)",
            NoteShape::Cymbal => "Cymbal",
        }
    }

    /// Whether the note holds until its key is released.
    pub fn is_held(self) -> bool {
        matches!(self, NoteShape::Sustain | NoteShape::Gate)
    }

    fn one_shot_points(self) -> &'static [EnvelopePoint] {
        match self {
            NoteShape::Minimal => &MINIMAL,
            NoteShape::Bell => &BELL,
            NoteShape::ReverseBell => &REVERSE_BELL,
            NoteShape::Drum { pop: false } => &DRUM,
            NoteShape::Drum { pop: true } => &DRUM_POP,
            NoteShape::Cymbal => &CYMBAL,
            NoteShape::Sustain => &SUSTAIN_INTRO,
            NoteShape::Gate => &GATE_INTRO,
        }
    }

    fn release_points(self) -> &'static [EnvelopePoint] {
        match self {
            NoteShape::Sustain => &SUSTAIN_RELEASE,
            _ => &GATE_RELEASE,
        }
    }
}

fn last_time(points: &[EnvelopePoint]) -> f32 {
    points.last().map_or(0.0, |p| p.time)
}

/// Age, release and death bookkeeping shared by every voice type.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    age: usize,
    dead: bool,
    wants_release: bool,
    release_age: Option<usize>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Age in samples of the next sample to be generated.
    pub fn age(&self) -> usize {
        self.age
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn wants_release(&self) -> bool {
        self.wants_release
    }

    pub fn release_age(&self) -> Option<usize> {
        self.release_age
    }

    pub fn release(&mut self) {
        self.wants_release = true;
    }

    pub fn kill(&mut self) {
        self.dead = true;
    }

    /// Evaluate `shape` for the current sample and age by one sample.
    ///
    /// Returns the current age in seconds alongside the envelope level.
    pub fn step(&mut self, shape: NoteShape, sample_rate: f32) -> (f32, f32) {
        let index = self.age;
        let seconds = index as f32 / sample_rate;
        self.age += 1;

        let level = if shape.is_held() {
            self.held_level(shape, index, seconds, sample_rate)
        } else {
            let points = shape.one_shot_points();
            if seconds > last_time(points) {
                self.dead = true;
            }
            envelope(seconds, points)
        };

        (seconds, level)
    }

    fn held_level(&mut self, shape: NoteShape, index: usize, seconds: f32, sample_rate: f32) -> f32 {
        let intro = shape.one_shot_points();

        if self.release_age.is_none() {
            if self.wants_release && seconds > last_time(intro) {
                self.release_age = Some(index);
            } else {
                return envelope(seconds, intro);
            }
        }

        let release = shape.release_points();
        let started = self.release_age.unwrap_or(index) as f32 / sample_rate;
        let in_release = seconds - started;
        if in_release > last_time(release) {
            self.dead = true;
        }
        envelope(in_release, release)
    }
}

/// Tremolo and vibrato rates in Hz; 0 leaves the sine at rest.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Modulation {
    pub tremolo_hz: f32,
    pub vibrato_hz: f32,
}

impl Modulation {
    /// Depth of the vibrato as a fraction of the note frequency.
    pub const VIBRATO_DEPTH: f32 = 0.05;

    /// Volume multiplier, swinging between 0.25 and 0.75 around 0.5.
    #[inline]
    pub fn tremolo(&self, seconds: f32) -> f32 {
        sine_wave(seconds * self.tremolo_hz) * 0.25 + 0.5
    }

    #[inline]
    pub fn vibrato(&self, frequency: f32, seconds: f32) -> f32 {
        frequency + frequency * sine_wave(seconds * self.vibrato_hz) * Self::VIBRATO_DEPTH
    }
}

/// One sounding note.
#[derive(Debug, Clone)]
pub struct Note {
    frequency: f32,
    waveform: Waveform,
    shape: NoteShape,
    gain: f32,
    glide: Option<Glide>,
    modulation: Option<Modulation>,
    phase: f32,
    /// Envelope level of the last sample.
    level: f32,
    lifecycle: Lifecycle,
}

impl Note {
    pub fn new(frequency: f32, waveform: Waveform, shape: NoteShape) -> Self {
        Self {
            frequency,
            waveform,
            shape,
            gain: 1.0,
            glide: None,
            modulation: None,
            phase: 0.0,
            level: 0.0,
            lifecycle: Lifecycle::new(),
        }
    }

    /// A noise burst with the cymbal envelope, at a quarter volume.
    pub fn cymbal() -> Self {
        Self::new(0.0, Waveform::Noise, NoteShape::Cymbal).with_gain(0.25)
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Sweep the pitch down to a fifth of the start frequency, drum style.
    pub fn with_frequency_decay(self) -> Self {
        let target = self.frequency * DRUM_DECAY_FLOOR;
        self.with_glide(Glide::new(target, DRUM_DECAY_TIME).after(DRUM_DECAY_START))
    }

    pub fn with_glide(mut self, glide: Glide) -> Self {
        self.glide = Some(glide);
        self
    }

    pub fn with_modulation(mut self, modulation: Modulation) -> Self {
        self.modulation = Some(modulation);
        self
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn shape(&self) -> NoteShape {
        self.shape
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn current_frequency(&self, seconds: f32) -> f32 {
        let mut frequency = self.frequency;
        if let Some(glide) = &self.glide {
            frequency = glide.frequency_at(frequency, seconds);
        }
        if let Some(modulation) = &self.modulation {
            frequency = modulation.vibrato(frequency, seconds);
        }
        frequency
    }

    /// Generate one sample and age the note by one sample.
    pub fn generate_sample(&mut self, sample_rate: f32) -> f32 {
        let (seconds, mut level) = self.lifecycle.step(self.shape, sample_rate);
        self.level = level;
        if let Some(modulation) = &self.modulation {
            level *= modulation.tremolo(seconds);
        }

        let frequency = self.current_frequency(seconds);
        self.phase = advance_phase(self.phase, frequency, sample_rate);
        self.waveform.sample(self.phase) * level * self.gain
    }
}

impl Voice for Note {
    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        self.generate_sample(sample_rate)
    }

    fn frequency(&self) -> f32 {
        self.frequency
    }

    fn release(&mut self) {
        self.lifecycle.release();
    }

    fn is_dead(&self) -> bool {
        self.lifecycle.is_dead()
    }

    fn envelope(&self) -> f32 {
        self.level
    }
}
