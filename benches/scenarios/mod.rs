//! Real-world scenario benchmarks.
//!
//! These model what the audio thread actually does while someone is
//! playing: a bank of held notes, and the whole callback through a demo.

mod session;
mod voices;

pub use session::bench_session;
pub use voices::bench_voices;
