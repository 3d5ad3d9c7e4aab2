use std::path::PathBuf;

/// Errors surfaced by the non-realtime parts of the crate (sample loading,
/// recording). Nothing on the audio callback path returns these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to decode wav file {path}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("unsupported wav layout in {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("wav file {0} contains no samples")]
    Empty(PathBuf),

    #[error("failed to write recording: {0}")]
    Recording(#[from] hound::Error),

    #[error("no audio stream has reported its format yet")]
    StreamNotRunning,

    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("no recording is in progress")]
    NotRecording,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
