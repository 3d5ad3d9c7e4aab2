use crate::dsp::interpolate::lerp;

/*
Master Bus
==========

The last stage before the device. Two jobs:

  Volume ramp   The target volume can change between buffers. Jumping to
                it at the buffer boundary is a step in amplitude, which is
                audible as a click. Instead the gain slides linearly across
                the buffer from where the last buffer ended:

                  gain(frame) = lerp(last, target, frame / frames)

  Clipping      Optional hard clip to [-1, 1]. Off by default so the demos
                can show what overdriving the output sounds like.
*/

#[derive(Debug, Clone)]
pub struct MasterBus {
    last_volume: f32,
}

impl MasterBus {
    pub fn new(initial_volume: f32) -> Self {
        Self {
            last_volume: initial_volume,
        }
    }

    /// Gain reached at the end of the previous buffer.
    pub fn last_volume(&self) -> f32 {
        self.last_volume
    }

    /// Apply the volume ramp (and optional clip) to an interleaved buffer.
    pub fn process(&mut self, out: &mut [f32], channels: usize, target_volume: f32, clip: bool) {
        let channels = channels.max(1);
        let frames = out.len() / channels;
        if frames == 0 {
            return;
        }

        for (frame, samples) in out.chunks_exact_mut(channels).enumerate() {
            let percent = frame as f32 / frames as f32;
            let gain = lerp(self.last_volume, target_volume, percent);
            for sample in samples.iter_mut() {
                *sample *= gain;
                if clip {
                    *sample = sample.clamp(-1.0, 1.0);
                }
            }
        }

        self.last_volume = target_volume;
    }
}
