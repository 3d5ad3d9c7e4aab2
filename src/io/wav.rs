//! WAV decoding and format conversion.
//!
//! Samples are converted once, at load time, to the output stream's sample
//! rate and channel count so playback is a plain indexed read.
//!
//! ```text
//! file ──→ decode (hound) ──→ resample ──→ change channels ──→ normalize
//!          int/float → f32    per channel   mono ↔ stereo      optional
//! ```

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::{
    dsp::interpolate::cubic_hermite,
    error::{Error, Result},
    io::sample::SampleBuffer,
};

/// Load `path` and convert it to `channels` channels at `sample_rate`.
pub fn load(
    path: impl AsRef<Path>,
    channels: usize,
    sample_rate: f32,
    normalize_data: bool,
) -> Result<SampleBuffer> {
    let path = path.as_ref();
    let wav_error = |source| Error::Wav {
        path: path.to_path_buf(),
        source,
    };

    let reader = WavReader::open(path).map_err(wav_error)?;
    let spec = reader.spec();
    let source_channels = spec.channels as usize;
    if source_channels == 0 || source_channels > 2 {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!("{source_channels} channels (only mono and stereo load)"),
        });
    }

    let decoded: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(wav_error)?,
        SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f32 * scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(wav_error)?
        }
    };

    if decoded.is_empty() {
        return Err(Error::Empty(path.to_path_buf()));
    }

    let resampled = resample(&decoded, source_channels, spec.sample_rate as f32, sample_rate);
    let mut samples = change_channels(&resampled, source_channels, channels);
    if normalize_data {
        normalize(&mut samples);
    }

    Ok(SampleBuffer::new(samples, channels, sample_rate))
}

/// Resample interleaved audio from `from_rate` to `to_rate`.
///
/// Each channel is interpolated independently with cubic Hermite; indices
/// past either end are clamped to the first/last frame.
pub fn resample(samples: &[f32], channels: usize, from_rate: f32, to_rate: f32) -> Vec<f32> {
    let channels = channels.max(1);
    if from_rate == to_rate || from_rate <= 0.0 || to_rate <= 0.0 {
        return samples.to_vec();
    }

    let frames = samples.len() / channels;
    if frames == 0 {
        return Vec::new();
    }

    let ratio = to_rate / from_rate;
    let new_frames = (frames as f32 * ratio) as usize;
    let last = frames - 1;
    let at = |frame: isize, channel: usize| {
        let frame = frame.clamp(0, last as isize) as usize;
        samples[frame * channels + channel]
    };

    let mut out = Vec::with_capacity(new_frames * channels);
    for frame in 0..new_frames {
        let position = frame as f32 / ratio;
        let whole = position.floor();
        let fraction = position - whole;
        let i = whole as isize;
        for channel in 0..channels {
            out.push(cubic_hermite(
                at(i - 1, channel),
                at(i, channel),
                at(i + 1, channel),
                at(i + 2, channel),
                fraction,
            ));
        }
    }
    out
}

/// Convert interleaved audio between channel counts.
///
/// Mono is duplicated to every output channel, anything folded down to mono
/// is summed. Other conversions keep the shared channels and zero the rest.
pub fn change_channels(samples: &[f32], from: usize, to: usize) -> Vec<f32> {
    let (from, to) = (from.max(1), to.max(1));
    if from == to {
        return samples.to_vec();
    }

    let mut out = Vec::with_capacity(samples.len() / from * to);
    for frame in samples.chunks_exact(from) {
        if from == 1 {
            out.extend(std::iter::repeat(frame[0]).take(to));
        } else if to == 1 {
            out.push(frame.iter().sum());
        } else {
            out.extend((0..to).map(|c| frame.get(c).copied().unwrap_or(0.0)));
        }
    }
    out
}

/// Center on the midpoint of the min/max range and scale the peak to 1.0.
///
/// Silent (constant) data is centered but not scaled.
pub fn normalize(samples: &mut [f32]) {
    let Some(&first) = samples.first() else {
        return;
    };
    let (min, max) = samples
        .iter()
        .fold((first, first), |(lo, hi), &s| (lo.min(s), hi.max(s)));

    let center = (min + max) * 0.5;
    let half_height = (max - min) * 0.5;
    let scale = if half_height > 0.0 { 1.0 / half_height } else { 1.0 };

    for sample in samples.iter_mut() {
        *sample = (*sample - center) * scale;
    }
}
