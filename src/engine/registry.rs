use std::sync::Arc;

use crate::io::SampleLibrary;

use super::demo::{Demo, KeyHandler};

/// What a demo factory gets to build with.
#[derive(Clone)]
pub struct DemoContext {
    pub channels: usize,
    pub sample_rate: f32,
    pub samples: Arc<SampleLibrary>,
}

impl DemoContext {
    pub fn new(channels: usize, sample_rate: f32, samples: Arc<SampleLibrary>) -> Self {
        Self {
            channels: channels.max(1),
            sample_rate,
            samples,
        }
    }

    /// Context with no samples loaded; sample-playing keys stay silent.
    pub fn without_samples(channels: usize, sample_rate: f32) -> Self {
        Self::new(channels, sample_rate, Arc::new(SampleLibrary::new()))
    }
}

type DemoFactory = Box<dyn Fn(&DemoContext) -> Box<dyn Demo> + Send + Sync>;

/// Ordered list of named demo factories.
///
/// Order is the order Left/Right step through.
#[derive(Default)]
pub struct DemoRegistry {
    entries: Vec<(&'static str, DemoFactory)>,
}

impl DemoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, name: &'static str, factory: F) -> Self
    where
        F: Fn(&DemoContext) -> Box<dyn Demo> + Send + Sync + 'static,
    {
        self.entries.push((name, Box::new(factory)));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instantiate every demo for one stream format.
    pub fn build(&self, context: &DemoContext) -> DemoSet {
        let demos = self
            .entries
            .iter()
            .map(|(name, factory)| {
                log::debug!("building demo {name}");
                factory(context)
            })
            .collect();

        DemoSet {
            demos,
            channels: context.channels,
            sample_rate: context.sample_rate,
        }
    }
}

/// Demo instances built for one stream format, ready to hand to a session.
pub struct DemoSet {
    demos: Vec<Box<dyn Demo>>,
    channels: usize,
    sample_rate: f32,
}

impl DemoSet {
    pub fn len(&self) -> usize {
        self.demos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demos.is_empty()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.demos.iter().map(|demo| demo.name()).collect()
    }

    pub(crate) fn into_parts(self) -> (Vec<Box<dyn Demo>>, Vec<(&'static str, Arc<dyn KeyHandler>)>) {
        let handlers = self
            .demos
            .iter()
            .map(|demo| (demo.name(), demo.key_handler()))
            .collect();
        (self.demos, handlers)
    }
}
