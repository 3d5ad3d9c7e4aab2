pub mod demos; // Bundled keyboard demos built on the primitives
pub mod dsp;
pub mod engine; // Audio callback driver, master bus and demo registry
pub mod error;
pub mod io;
pub mod synth; // Notes, voice banks and keyboard mapping

pub use engine::{AudioEngine, EngineConfig, Session, SessionInput};
pub use error::{Error, Result};
