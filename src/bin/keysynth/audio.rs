//! Default output device, driven by the session's audio engine.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use keysynth::AudioEngine;

/// An opened, not yet running, output device.
pub struct Output {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
    pub channels: usize,
    pub sample_rate: f32,
}

impl Output {
    pub fn open() -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(eyre!(
                "unsupported output sample format {:?}, expected f32",
                config.sample_format()
            ));
        }

        let channels = config.channels() as usize;
        let sample_rate = config.sample_rate().0 as f32;
        log::info!(
            "output: {} ({} channels, {} Hz)",
            device.name().unwrap_or_else(|_| "unknown device".into()),
            channels,
            sample_rate
        );

        Ok(Self {
            device,
            config,
            channels,
            sample_rate,
        })
    }

    /// Start the stream. The engine moves onto the audio thread for good.
    pub fn start(self, mut engine: AudioEngine) -> EyreResult<cpal::Stream> {
        let channels = self.channels;
        let sample_rate = self.sample_rate;

        let stream = self
            .device
            .build_output_stream(
                &self.config.into(),
                move |data: &mut [f32], _| {
                    engine.generate_audio_samples(data, channels, sample_rate);
                },
                |err| eprintln!("Audio error: {}", err),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;
        Ok(stream)
    }
}
