// Purpose - PCM in (wav decoding, format conversion) and PCM out (recording)

#[cfg(feature = "rtrb")]
pub mod recorder;
pub mod sample;
pub mod wav;

#[cfg(feature = "rtrb")]
pub use recorder::{recording_channel, RecordTap, Recorder};
pub use sample::{SampleBuffer, SampleLibrary, SAMPLE_NAMES};
