/// Fixed-capacity circular buffer with a single running index.
///
/// Every delay-line effect owns one of these. Capacity is chosen once by the
/// effect's `set_effect_params` (the only place that allocates); after that
/// reads, writes and `advance` are plain index arithmetic.
///
/// A capacity of zero is valid and means "no delay line": effects check
/// `is_empty` and pass audio straight through.
#[derive(Debug, Clone, Default)]
pub struct CircularBuffer {
    data: Vec<f32>,
    index: usize,
}

impl CircularBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity],
            index: 0,
        }
    }

    /// Reallocate to `capacity` zeroed samples and rewind the index.
    pub fn resize(&mut self, capacity: usize) {
        self.data = vec![0.0; capacity];
        self.index = 0;
    }

    /// Zero the contents and rewind the index without reallocating.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
        self.index = 0;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value at the current index.
    #[inline]
    pub fn current(&self) -> f32 {
        self.data[self.index]
    }

    /// Overwrite the value at the current index.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.data[self.index] = sample;
    }

    /// Value `offset` slots ahead of the current index, wrapping.
    #[inline]
    pub fn ahead(&self, offset: usize) -> f32 {
        self.data[(self.index + offset) % self.data.len()]
    }

    /// Value written `delay` advances ago (`1..=capacity`), wrapping.
    ///
    /// A delay equal to the capacity reads the current slot, i.e. the oldest
    /// sample still held.
    #[inline]
    pub fn behind(&self, delay: usize) -> f32 {
        let len = self.data.len();
        self.data[(self.index + len - delay % len) % len]
    }

    /// Move to the next slot.
    #[inline]
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.data.len();
    }
}

/// Number of interleaved samples needed to hold `seconds` of audio.
///
/// Frames are truncated before being multiplied by the channel count, so the
/// capacity is always a whole number of frames.
#[inline]
pub fn samples_for(seconds: f32, sample_rate: f32, channels: usize) -> usize {
    let frames = (seconds * sample_rate).max(0.0) as usize;
    frames * channels
}
