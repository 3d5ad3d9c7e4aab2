//! FFT magnitude analysis for offline inspection of rendered audio.
//!
//! Not realtime-safe: planning allocates. Used to check filter responses and
//! the harmonic content of band-limited waveforms.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Windowed FFT over a fixed block length.
pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Linear magnitude per bin, `0..len/2`
    magnitudes: Vec<f32>,
    sample_rate: f32,
}

impl SpectrumAnalyzer {
    pub fn new(len: usize, sample_rate: f32) -> Self {
        let len = len.max(2);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(len);

        // Hann window - reduces spectral leakage
        let denom = (len - 1) as f32;
        let window = (0..len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); len],
            magnitudes: vec![0.0; len / 2],
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Width of one bin in Hz.
    pub fn bin_width(&self) -> f32 {
        self.sample_rate / self.len() as f32
    }

    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.bin_width()
    }

    /// Analyze a block and return the magnitude of each bin up to Nyquist.
    ///
    /// Shorter input is zero padded, longer input is truncated. Magnitudes
    /// are scaled so a full-scale sine centred on a bin reads about 1.0.
    pub fn analyze(&mut self, samples: &[f32]) -> &[f32] {
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let sample = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        // Hann window has a coherent gain of 0.5
        let scale = 4.0 / self.len() as f32;
        for (magnitude, bin) in self.magnitudes.iter_mut().zip(&self.scratch) {
            *magnitude = bin.norm() * scale;
        }
        &self.magnitudes
    }

    /// Magnitudes from the last `analyze` call.
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// Magnitude of the bin nearest `frequency` from the last analysis.
    pub fn magnitude_at(&self, frequency: f32) -> f32 {
        let bin = (frequency / self.bin_width()).round() as usize;
        self.magnitudes.get(bin).copied().unwrap_or(0.0)
    }

    /// Frequency of the strongest non-DC bin from the last analysis.
    pub fn dominant_frequency(&self) -> f32 {
        let strongest = self
            .magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .fold((0, 0.0f32), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
        self.bin_frequency(strongest.0)
    }
}

/// One-shot helper: strongest frequency in `samples`.
pub fn dominant_frequency(samples: &[f32], sample_rate: f32) -> f32 {
    let mut analyzer = SpectrumAnalyzer::new(samples.len(), sample_rate);
    analyzer.analyze(samples);
    analyzer.dominant_frequency()
}
