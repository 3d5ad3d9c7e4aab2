use std::sync::Arc;

use crate::{
    dsp::biquad::{Biquad, BiquadType},
    engine::{controls::AtomicF32, AudioBlock, Cycle, Demo, DemoContext, Key, KeyHandler, Selector},
    synth::{Note, NoteShape, VoiceBank},
};

use super::{digit_for, note_for, Instrument, NOTE_GAIN};

const DEFAULT_CUTOFF: f32 = 1_000.0;
const MIN_CUTOFF: f32 = 20.0;
const MAX_CUTOFF: f32 = 20_000.0;
const DEFAULT_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;
const MIN_Q: f32 = 0.1;
const MAX_Q: f32 = 20.0;
/// Boost or cut used by the peak and shelf types.
const PEAK_GAIN_DB: f32 = 6.0;

impl Cycle for BiquadType {
    const ALL: &'static [Self] = &BiquadType::ALL;

    fn label(self) -> &'static str {
        BiquadType::label(self)
    }
}

/// Filter settings the audio thread designs coefficients from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Settings {
    kind: BiquadType,
    cutoff: f32,
    q: f32,
}

struct Shared {
    notes: VoiceBank,
    kind: Selector<BiquadType>,
    cutoff: AtomicF32,
    q: AtomicF32,
}

impl Shared {
    fn settings(&self) -> Settings {
        Settings {
            kind: self.kind.get(),
            cutoff: self.cutoff.load(),
            q: self.q.load(),
        }
    }

    fn report(&self) -> String {
        let Settings { kind, cutoff, q } = self.settings();
        format!("Filter: {}  Cutoff: {cutoff:.0} Hz  Q: {q:.2}", kind.label())
    }

    fn scale(value: &AtomicF32, factor: f32, min: f32, max: f32) {
        value.store((value.load() * factor).clamp(min, max));
    }
}

impl KeyHandler for Shared {
    fn on_enter(&self) {
        self.kind.reset();
        self.cutoff.store(DEFAULT_CUTOFF);
        self.q.store(DEFAULT_Q);
        self.notes.clear();
    }

    fn on_key(&self, key: Key, pressed: bool) -> Option<String> {
        if pressed {
            let handled = match digit_for(key) {
                Some(1) => {
                    self.kind.next();
                    true
                }
                Some(2) => {
                    Self::scale(&self.cutoff, 0.5, MIN_CUTOFF, MAX_CUTOFF);
                    true
                }
                Some(3) => {
                    Self::scale(&self.cutoff, 2.0, MIN_CUTOFF, MAX_CUTOFF);
                    true
                }
                Some(4) => {
                    Self::scale(&self.q, std::f32::consts::FRAC_1_SQRT_2, MIN_Q, MAX_Q);
                    true
                }
                Some(5) => {
                    Self::scale(&self.q, std::f32::consts::SQRT_2, MIN_Q, MAX_Q);
                    true
                }
                _ => false,
            };
            if handled {
                return Some(self.report());
            }
        }

        let frequency = note_for(key)?;
        if pressed {
            let note = Note::new(frequency, Instrument::Saw.waveform(), NoteShape::Gate)
                .with_gain(NOTE_GAIN);
            self.notes.start(note);
        } else {
            self.notes.release(frequency);
        }
        None
    }

    fn help(&self) -> &'static str {
        "Letter keys to play notes.\n\
         1 = Cycle Filter Type\n2 = Halve Cutoff\n3 = Double Cutoff\n\
         4 = Lower Q\n5 = Raise Q"
    }
}

/// A band-limited saw through one biquad per output channel.
pub struct FilterDemo {
    shared: Arc<Shared>,
    filters: Vec<Biquad>,
    applied: Option<(Settings, f32)>,
}

impl FilterDemo {
    pub fn new(context: &DemoContext) -> Self {
        Self {
            shared: Arc::new(Shared {
                notes: VoiceBank::new(),
                kind: Selector::default(),
                cutoff: AtomicF32::new(DEFAULT_CUTOFF),
                q: AtomicF32::new(DEFAULT_Q),
            }),
            filters: vec![Biquad::new(); context.channels],
            applied: None,
        }
    }

    /// Redesign the filters when a setting or the stream format changed.
    fn sync_filters(&mut self, settings: Settings, channels: usize, sample_rate: f32) {
        if self.applied == Some((settings, sample_rate)) && self.filters.len() == channels {
            return;
        }

        // tan() blows up at Nyquist
        let cutoff = settings.cutoff.min(sample_rate * 0.45);
        self.filters.resize_with(channels, Biquad::new);
        for filter in &mut self.filters {
            filter.set_effect_params(settings.kind, cutoff, sample_rate, settings.q, PEAK_GAIN_DB);
        }
        self.applied = Some((settings, sample_rate));
    }
}

impl Demo for FilterDemo {
    fn name(&self) -> &'static str {
        "Biquad Filter"
    }

    fn key_handler(&self) -> Arc<dyn KeyHandler> {
        self.shared.clone()
    }

    fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
        self.sync_filters(self.shared.settings(), block.channels, block.sample_rate);

        let frames = block.frames();
        let sample_rate = block.sample_rate;
        let filters = &mut self.filters;
        self.shared.notes.render(frames, sample_rate, |frame, value| {
            block.map_frame(frame, |channel| filters[channel].add_sample(value));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 16_000.0;

    fn energy(demo: &mut FilterDemo, channels: usize) -> (Vec<f32>, f32) {
        demo.key_handler().on_key(Key::Char('a'), true);
        let mut out = vec![0.0; channels * 4_000];
        demo.generate_samples(&mut AudioBlock::new(&mut out, channels, SR, 0));
        let energy = out[channels * 2_000..].iter().map(|s| s * s).sum();
        (out, energy)
    }

    #[test]
    fn keys_move_cutoff_and_q_within_limits() {
        let demo = FilterDemo::new(&DemoContext::without_samples(1, SR));
        let handler = demo.key_handler();
        assert_eq!(
            handler.on_key(Key::Char('2'), true).as_deref(),
            Some("Filter: low-pass  Cutoff: 500 Hz  Q: 0.71")
        );
        for _ in 0..20 {
            handler.on_key(Key::Char('2'), true);
            handler.on_key(Key::Char('5'), true);
        }
        let settings = demo.shared.settings();
        assert_eq!(settings.cutoff, MIN_CUTOFF);
        assert_eq!(settings.q, MAX_Q);

        handler.on_key(Key::Char('1'), true);
        handler.on_enter();
        assert_eq!(
            demo.shared.settings(),
            Settings {
                kind: BiquadType::LowPass,
                cutoff: DEFAULT_CUTOFF,
                q: DEFAULT_Q,
            }
        );
    }

    #[test]
    fn lower_cutoff_darkens_the_saw() {
        let mut open = FilterDemo::new(&DemoContext::without_samples(1, SR));
        let (_, bright) = energy(&mut open, 1);

        let mut closed = FilterDemo::new(&DemoContext::without_samples(1, SR));
        for _ in 0..3 {
            closed.key_handler().on_key(Key::Char('2'), true);
        }
        let (_, dark) = energy(&mut closed, 1);
        assert!(dark < bright * 0.9, "dark {dark} bright {bright}");
    }

    #[test]
    fn every_channel_gets_its_own_filter() {
        let mut demo = FilterDemo::new(&DemoContext::without_samples(1, SR));
        let (out, _) = energy(&mut demo, 2);
        assert_eq!(demo.filters.len(), 2);
        for frame in out.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn cutoff_is_kept_below_nyquist() {
        let mut demo = FilterDemo::new(&DemoContext::without_samples(1, 8_000.0));
        for _ in 0..5 {
            demo.key_handler().on_key(Key::Char('3'), true);
        }
        demo.key_handler().on_key(Key::Char('a'), true);
        let mut out = vec![0.0; 1_000];
        demo.generate_samples(&mut AudioBlock::new(&mut out, 1, 8_000.0, 0));
        assert!(out.iter().all(|s| s.is_finite()));
    }
}
