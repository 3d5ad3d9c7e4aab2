use std::{path::PathBuf, sync::Arc};

#[cfg(feature = "rtrb")]
use crate::io::{recording_channel, RecordTap, Recorder};

use super::{
    config::EngineConfig,
    controls::{ControlSnapshot, SessionControls},
    demo::{AudioBlock, Demo, Key, KeyHandler},
    master::MasterBus,
    registry::DemoSet,
};

/// Builds the two halves of a running session.
pub struct Session;

impl Session {
    /// Split `demos` into the audio-thread engine and the input-thread
    /// controller. Both halves share one set of controls.
    pub fn new(config: EngineConfig, demos: DemoSet) -> (AudioEngine, SessionInput) {
        #[cfg(feature = "rtrb")]
        let capacity = config.recording_capacity(demos.channels(), demos.sample_rate());

        let (demos, handlers) = demos.into_parts();
        let controls = Arc::new(SessionControls::new(config.initial_volume, config.clipping));
        if !demos.is_empty() {
            controls.set_current_demo(config.initial_demo.min(demos.len() - 1));
        }

        #[cfg(feature = "rtrb")]
        let (tap, recorder) = recording_channel(capacity);

        let engine = AudioEngine {
            demos,
            controls: Arc::clone(&controls),
            master: MasterBus::new(controls.volume()),
            sample_clock: 0,
            #[cfg(feature = "rtrb")]
            tap,
        };

        let input = SessionInput {
            controls,
            handlers,
            #[cfg(feature = "rtrb")]
            recorder,
            recording_dir: config.recording_dir,
        };

        (engine, input)
    }
}

/// Audio-thread half. Owns the demos and everything they process with.
pub struct AudioEngine {
    demos: Vec<Box<dyn Demo>>,
    controls: Arc<SessionControls>,
    master: MasterBus,
    sample_clock: u64,
    #[cfg(feature = "rtrb")]
    tap: RecordTap,
}

impl AudioEngine {
    /// Fill one interleaved device buffer.
    ///
    /// This is the only entry point called from the real-time thread. It
    /// never allocates, logs or touches the file system.
    pub fn generate_audio_samples(&mut self, out: &mut [f32], channels: usize, sample_rate: f32) {
        let channels = channels.max(1);
        let frames = out.len() / channels;
        let snapshot = self.controls.snapshot();

        out.fill(0.0);

        // one block per device buffer: voice banks lock once and prune after
        if let Some(demo) = self.demos.get_mut(snapshot.current_demo) {
            let mut block = AudioBlock::new(out, channels, sample_rate, self.sample_clock);
            demo.generate_samples(&mut block);
        }

        self.master
            .process(out, channels, snapshot.volume, snapshot.clipping);

        #[cfg(feature = "rtrb")]
        self.tap.capture(out, channels, sample_rate);

        self.sample_clock += frames as u64;
    }

    /// Frames rendered since the stream started.
    pub fn sample_clock(&self) -> u64 {
        self.sample_clock
    }

    pub fn demo_count(&self) -> usize {
        self.demos.len()
    }
}

/// What the input loop should do after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    None,
    /// Text for the user, one or more lines.
    Message(String),
    Exit,
}

impl From<Option<String>> for InputEvent {
    fn from(message: Option<String>) -> Self {
        message.map_or(InputEvent::None, InputEvent::Message)
    }
}

/// Input-thread half: global keys, demo switching and recording.
pub struct SessionInput {
    controls: Arc<SessionControls>,
    handlers: Vec<(&'static str, Arc<dyn KeyHandler>)>,
    #[cfg(feature = "rtrb")]
    recorder: Recorder,
    recording_dir: PathBuf,
}

impl SessionInput {
    pub fn on_key(&mut self, key: Key, pressed: bool) -> InputEvent {
        match key {
            Key::Escape => return InputEvent::Exit,
            Key::Up | Key::Down => {
                if !pressed {
                    return InputEvent::None;
                }
                let delta = if key == Key::Up {
                    SessionControls::VOLUME_STEP
                } else {
                    -SessionControls::VOLUME_STEP
                };
                let volume = self.controls.adjust_volume(delta);
                return InputEvent::Message(format!("Volume: {:.0}%", volume * 100.0));
            }
            Key::Left | Key::Right => {
                if !pressed {
                    return InputEvent::None;
                }
                let current = self.controls.current_demo();
                let next = if key == Key::Left {
                    current.checked_sub(1)
                } else {
                    Some(current + 1).filter(|&i| i < self.handlers.len())
                };
                return match next {
                    Some(index) => {
                        self.controls.set_current_demo(index);
                        InputEvent::Message(self.enter_current())
                    }
                    None => InputEvent::None,
                };
            }
            Key::Function(1) => {
                if !pressed {
                    return InputEvent::None;
                }
                let on = self.controls.toggle_clipping();
                return InputEvent::Message(format!("Clipping: {}", on_off(on)));
            }
            Key::Function(2) => {
                if !pressed {
                    return InputEvent::None;
                }
                return InputEvent::Message(self.toggle_recording());
            }
            _ => {}
        }

        match self.current_handler() {
            Some(handler) => handler.on_key(key, pressed).into(),
            None => InputEvent::None,
        }
    }

    /// Reset the current demo and describe it.
    pub fn enter_current(&self) -> String {
        let index = self.controls.current_demo();
        let Some((name, handler)) = self.handlers.get(index) else {
            return "No demos loaded".to_string();
        };
        handler.on_enter();
        log::debug!("entered demo {name}");

        let help = handler.help();
        if help.is_empty() {
            format!("Entering Demo: {name}")
        } else {
            format!("Entering Demo: {name}\n{help}")
        }
    }

    pub fn current_demo_name(&self) -> Option<&'static str> {
        self.handlers
            .get(self.controls.current_demo())
            .map(|(name, _)| *name)
    }

    pub fn demo_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|(name, _)| *name).collect()
    }

    pub fn controls(&self) -> ControlSnapshot {
        self.controls.snapshot()
    }

    /// Write captured audio to disk. Call this regularly from the input loop.
    #[cfg(feature = "rtrb")]
    pub fn flush_recording(&mut self) -> crate::Result<usize> {
        self.recorder.flush()
    }

    #[cfg(not(feature = "rtrb"))]
    pub fn flush_recording(&mut self) -> crate::Result<usize> {
        Ok(0)
    }

    fn current_handler(&self) -> Option<&Arc<dyn KeyHandler>> {
        self.handlers
            .get(self.controls.current_demo())
            .map(|(_, handler)| handler)
    }

    #[cfg(feature = "rtrb")]
    fn toggle_recording(&mut self) -> String {
        if self.recorder.is_recording() {
            self.controls.set_recording(false);
            match self.recorder.stop() {
                Ok(path) => format!("Recording stopped: {}", path.display()),
                Err(err) => {
                    log::error!("failed to stop recording: {err}");
                    format!("ERROR: {err}")
                }
            }
        } else {
            match self.recorder.start(&self.recording_dir) {
                Ok(path) => {
                    self.controls.set_recording(true);
                    format!("Started recording audio to {}", path.display())
                }
                Err(err) => {
                    log::error!("failed to start recording: {err}");
                    format!("ERROR: could not start recording: {err}")
                }
            }
        }
    }

    #[cfg(not(feature = "rtrb"))]
    fn toggle_recording(&mut self) -> String {
        log::warn!(
            "recording to {} requested but the rtrb feature is disabled",
            self.recording_dir.display()
        );
        "Recording is not available in this build".to_string()
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "On"
    } else {
        "Off"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::engine::registry::{DemoContext, DemoRegistry};

    #[derive(Default)]
    struct Counter {
        entered: AtomicUsize,
        keys: AtomicUsize,
    }

    impl KeyHandler for Counter {
        fn on_enter(&self) {
            self.entered.fetch_add(1, Ordering::Relaxed);
        }

        fn on_key(&self, _key: Key, pressed: bool) -> Option<String> {
            if pressed {
                self.keys.fetch_add(1, Ordering::Relaxed);
            }
            None
        }

        fn help(&self) -> &'static str {
            "1 = nothing"
        }
    }

    /// Writes a constant to every sample.
    struct Constant {
        value: f32,
        handler: Arc<Counter>,
    }

    impl Demo for Constant {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn key_handler(&self) -> Arc<dyn KeyHandler> {
            self.handler.clone()
        }

        fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
            for frame in 0..block.frames() {
                block.fill_frame(frame, self.value);
            }
        }
    }

    fn session(values: &'static [f32]) -> (AudioEngine, SessionInput, Vec<Arc<Counter>>) {
        let counters: Vec<Arc<Counter>> = values.iter().map(|_| Arc::default()).collect();
        let mut registry = DemoRegistry::new();
        for (value, counter) in values.iter().zip(&counters) {
            let counter = Arc::clone(counter);
            let value = *value;
            registry = registry.register("constant", move |_| {
                Box::new(Constant {
                    value,
                    handler: Arc::clone(&counter),
                })
            });
        }
        let set = registry.build(&DemoContext::without_samples(2, 1_000.0));
        let config = EngineConfig::new().volume(1.0);
        let (engine, input) = Session::new(config, set);
        (engine, input, counters)
    }

    #[test]
    fn renders_current_demo_through_master_bus() {
        let (mut engine, _input, _) = session(&[0.5]);
        let mut out = vec![9.0; 64];
        engine.generate_audio_samples(&mut out, 2, 1_000.0);
        assert!(out.iter().all(|&s| (s - 0.5).abs() < 1e-6));
        assert_eq!(engine.sample_clock(), 32);
    }

    #[test]
    fn large_buffers_render_in_one_block() {
        let (mut engine, _input, _) = session(&[0.25]);
        let mut out = vec![0.0; 10_000 * 2];
        engine.generate_audio_samples(&mut out, 2, 1_000.0);
        assert!(out.iter().all(|&s| (s - 0.25).abs() < 1e-6));
        assert_eq!(engine.sample_clock(), 10_000);
    }

    #[test]
    fn voices_are_pruned_only_after_the_whole_buffer() {
        use crate::{
            dsp::Waveform,
            synth::{Note, NoteShape, VoiceBank},
        };

        // a Minimal note lives 250 ms, far less than this 1 s buffer
        struct Bank(Arc<Notes>);
        struct Notes {
            bank: VoiceBank,
            lens: std::sync::Mutex<Vec<usize>>,
        }
        impl KeyHandler for Notes {
            fn on_enter(&self) {}
            fn on_key(&self, _: Key, _: bool) -> Option<String> {
                None
            }
        }
        impl Demo for Bank {
            fn name(&self) -> &'static str {
                "bank"
            }
            fn key_handler(&self) -> Arc<dyn KeyHandler> {
                self.0.clone()
            }
            fn generate_samples(&mut self, block: &mut AudioBlock<'_>) {
                let frames = block.frames();
                self.0.bank.render(frames, block.sample_rate, |f, v| block.fill_frame(f, v));
                if let Ok(mut lens) = self.0.lens.lock() {
                    lens.push(self.0.bank.len());
                }
            }
        }

        let notes = Arc::new(Notes {
            bank: VoiceBank::new(),
            lens: Default::default(),
        });
        notes
            .bank
            .start(Note::new(100.0, Waveform::Sine, NoteShape::Minimal));
        let shared = Arc::clone(&notes);
        let set = DemoRegistry::new()
            .register("bank", move |_| Box::new(Bank(Arc::clone(&shared))))
            .build(&DemoContext::without_samples(1, 8_000.0));
        let (mut engine, _input) = Session::new(EngineConfig::new(), set);

        let mut out = vec![0.0; 8_000];
        engine.generate_audio_samples(&mut out, 1, 8_000.0);
        assert_eq!(*notes.lens.lock().unwrap(), vec![0]);
        assert!(out[..2_000].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn arrows_switch_demo_without_wrapping() {
        let (mut engine, mut input, counters) = session(&[0.1, 0.2]);

        assert_eq!(input.on_key(Key::Left, true), InputEvent::None);
        let event = input.on_key(Key::Right, true);
        assert!(matches!(event, InputEvent::Message(ref m) if m.contains("1 = nothing")));
        assert_eq!(counters[1].entered.load(Ordering::Relaxed), 1);
        assert_eq!(input.on_key(Key::Right, true), InputEvent::None);

        let mut out = vec![0.0; 8];
        engine.generate_audio_samples(&mut out, 2, 1_000.0);
        assert!(out.iter().all(|&s| (s - 0.2).abs() < 1e-6));
    }

    #[test]
    fn volume_and_clipping_keys() {
        let (_engine, mut input, _) = session(&[0.0]);
        assert_eq!(
            input.on_key(Key::Down, true),
            InputEvent::Message("Volume: 90%".into())
        );
        assert_eq!(input.on_key(Key::Down, false), InputEvent::None);
        assert_eq!(
            input.on_key(Key::Function(1), true),
            InputEvent::Message("Clipping: On".into())
        );
        assert!(input.controls().clipping);
        assert_eq!(input.on_key(Key::Escape, true), InputEvent::Exit);
    }

    #[test]
    fn other_keys_reach_the_demo() {
        let (_engine, mut input, counters) = session(&[0.0]);
        input.on_key(Key::Char('a'), true);
        input.on_key(Key::Char('a'), false);
        assert_eq!(counters[0].keys.load(Ordering::Relaxed), 1);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn f2_records_the_master_output() {
        let dir = tempfile::tempdir().unwrap();
        let counters = vec![Arc::new(Counter::default())];
        let counter = Arc::clone(&counters[0]);
        let set = DemoRegistry::new()
            .register("constant", move |_| {
                Box::new(Constant {
                    value: 0.5,
                    handler: Arc::clone(&counter),
                })
            })
            .build(&DemoContext::without_samples(1, 8_000.0));
        let config = EngineConfig::new().volume(1.0).recording_dir(dir.path());
        let (mut engine, mut input) = Session::new(config, set);

        let mut out = vec![0.0; 16];
        engine.generate_audio_samples(&mut out, 1, 8_000.0);
        let event = input.on_key(Key::Function(2), true);
        assert!(matches!(event, InputEvent::Message(ref m) if m.starts_with("Started")));
        assert!(input.controls().recording);

        engine.generate_audio_samples(&mut out, 1, 8_000.0);
        assert_eq!(input.flush_recording().unwrap(), 16);
        input.on_key(Key::Function(2), true);

        let reader = hound::WavReader::open(dir.path().join("recording.wav")).unwrap();
        assert_eq!(reader.len(), 16);
    }
}
