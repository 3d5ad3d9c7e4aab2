//! Turning a sine up past full scale.
//!
//! Letter keys pick the tone and number keys the gain. Anything over 100%
//! is hard clipped when master clipping (F1) is on and is otherwise left to
//! the output device.

use std::sync::Arc;

use crate::{
    dsp::oscillator::{advance_phase, sine_wave},
    engine::{controls::AtomicF32, AudioBlock, Demo, DemoContext, Key, KeyHandler},
    io::SampleLibrary,
    synth::{SampleVoice, VoiceBank},
};

use super::{digit_for, note_or_low_for};

const SAMPLE: &str = "legend2";
/// Key '0' jumps straight to 2000%.
const LOUDEST: f32 = 20.0;

struct Shared {
    frequency: AtomicF32,
    amplifier: AtomicF32,
    voice: VoiceBank<SampleVoice>,
    samples: Arc<SampleLibrary>,
}

impl Shared {
    fn report(&self) -> String {
        format!(
            "Frequency = {:.2}hz, Volume = {}%",
            self.frequency.load(),
            (self.amplifier.load() * 100.0) as i32
        )
    }

    fn toggle_voice(&self) {
        if !self.voice.is_empty() {
            self.voice.clear();
            return;
        }
        match self.samples.get(SAMPLE) {
            Some(buffer) => self.voice.start(SampleVoice::new(SAMPLE, buffer).with_fade()),
            None => log::debug!("sample '{SAMPLE}' not loaded"),
        }
    }
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.frequency.store(0.0);
        self.amplifier.store(1.0);
        self.voice.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if !pressed {
            return None;
        }

        if let Some(digit) = digit_for(key) {
            let amplifier = if digit == 0 { LOUDEST } else { digit as f32 };
            self.amplifier.store(amplifier);
        } else if key == Key::Char(' ') {
            self.frequency.store(0.0);
        } else if key == Key::Char('=') {
            self.toggle_voice();
            return None;
        } else {
            self.frequency.store(note_or_low_for(key)?);
        }
        Some(self.report())
    }

    fn help(&self) -> &'static str {
        "Letter keys to play different sine tones. Space to silence.\n\
         - = very low tone\n\
         1-9 = volume 100% to 900%\n0 = volume 2000%\n\
         = = toggle voice sample"
    }
}

/// One sine tone and an optional voice sample, amplified.
pub struct ClippingDemo {
    shared: Arc<Shared>,
    phase: f32,
}

impl ClippingDemo {
    pub fn new(context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                frequency: AtomicF32::new(0.0),
                amplifier: AtomicF32::new(1.0),
                voice: VoiceBank::with_capacity(1),
                samples: Arc::clone(&context.samples),
            }),
            phase: 0.0,
        }
    }
}

impl Demo for ClippingDemo {
    fn name(&self) -> &'static str {
        "Clipping"
    }

    fn key_handler(&self) -> Arc<dyn KeyHandler> {
        self.shared.clone()
    }

    fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
        let frequency = self.shared.frequency.load();
        let amplifier = self.shared.amplifier.load();
        if frequency == 0.0 {
            // a stopped tone rests at zero rather than holding an offset
            self.phase = 0.0;
        }
        let frames = block.frames();
        let sample_rate = block.sample_rate;
        let phase = &mut self.phase;
        self.shared.voice.render(frames, sample_rate, |frame, voice| {
            let value = (sine_wave(*phase) + voice) * amplifier;
            *phase = advance_phase(*phase, frequency, sample_rate);
            block.fill_frame(frame, value);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{io::SampleBuffer, synth::note_to_frequency};

    fn peak(out: &[f32]) -> f32 {
        out.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn keys_report_frequency_and_volume() {
        let demo = ClippingDemo::new(&DemoContext::without_samples(1, 1_000.0));
        let handler = demo.key_handler();
        assert_eq!(
            handler.on_key(Key::Char('a'), true).as_deref(),
            Some("Frequency = 110.00hz, Volume = 100%")
        );
        assert_eq!(
            handler.on_key(Key::Char('0'), true).as_deref(),
            Some("Frequency = 110.00hz, Volume = 2000%")
        );
        assert_eq!(
            handler.on_key(Key::Char(' '), true).as_deref(),
            Some("Frequency = 0.00hz, Volume = 2000%")
        );
        assert_eq!(handler.on_key(Key::Char('a'), false), None);
        assert_eq!(handler.on_key(Key::Up, true), None);

        handler.on_key(Key::Char('-'), true);
        assert_eq!(demo.shared.frequency.load(), note_to_frequency(0, 0));

        handler.on_enter();
        assert_eq!(demo.shared.frequency.load(), 0.0);
        assert_eq!(demo.shared.amplifier.load(), 1.0);
    }

    #[test]
    fn amplifier_drives_the_sine_past_full_scale() {
        let mut demo = ClippingDemo::new(&DemoContext::without_samples(2, 8_000.0));
        let handler = demo.key_handler();
        handler.on_key(Key::Char('a'), true);
        handler.on_key(Key::Char('5'), true);

        let mut out = vec![0.0; 2 * 800];
        demo.generate_samples(&mut AudioBlock::new(&mut out, 2, 8_000.0, 0));
        assert!(peak(&out) > 4.9);
        assert!(peak(&out) <= 5.0 + 1e-4);

        // space stops the tone but keeps the volume
        handler.on_key(Key::Char(' '), true);
        demo.generate_samples(&mut AudioBlock::new(&mut out, 2, 8_000.0, 800));
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn equals_toggles_the_voice_sample() {
        let sr = 1_000.0;
        let mut library = SampleLibrary::new();
        library.insert(SAMPLE, SampleBuffer::new(vec![0.5; 1_000], 1, sr));
        let mut demo = ClippingDemo::new(&DemoContext::new(1, sr, Arc::new(library)));
        let handler = demo.key_handler();

        assert_eq!(handler.on_key(Key::Char('='), true), None);
        handler.on_key(Key::Char('3'), true);
        let mut out = vec![0.0; 500];
        demo.generate_samples(&mut AudioBlock::new(&mut out, 1, sr, 0));
        // past the 100 ms fade: half-scale sample tripled
        assert!((out[300] - 1.5).abs() < 1e-5);

        handler.on_key(Key::Char('='), true);
        assert!(demo.shared.voice.is_empty());
    }
}
