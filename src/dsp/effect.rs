/// Core trait for per-sample effects.
///
/// Effects are owned by the audio thread. Configuration (`set_effect_params`
/// on each concrete type) may allocate; everything in this trait must not.
pub trait Effect: Send {
    /// Push one sample through the effect and return the output.
    fn add_sample(&mut self, sample: f32) -> f32;

    /// Silence any stored tail without changing the configuration.
    ///
    /// Call this when an effect is toggled on or off so stale echoes from the
    /// previous use are not replayed.
    fn clear_buffer(&mut self);

    /// Process a block in place, one sample at a time.
    fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.add_sample(*sample);
        }
    }
}

/// Allow boxed effects to be used as effects (for dynamic chains)
impl Effect for Box<dyn Effect> {
    fn add_sample(&mut self, sample: f32) -> f32 {
        (**self).add_sample(sample)
    }

    fn clear_buffer(&mut self) {
        (**self).clear_buffer()
    }

    fn process_block(&mut self, buffer: &mut [f32]) {
        (**self).process_block(buffer)
    }
}
