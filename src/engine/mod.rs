//! The audio callback driver.
//!
//! A [`Session`] splits the bundled demos into two halves: the
//! [`AudioEngine`], owned by the real-time audio thread, and the
//! [`SessionInput`], owned by whatever thread reads the keyboard. They share
//! nothing but atomics and each demo's voice bank.

pub mod config;
pub mod controls;
pub mod demo;
pub mod master;
pub mod registry;
pub mod session;

pub use config::EngineConfig;
pub use controls::{ControlSnapshot, Cycle, Selector, SessionControls};
pub use demo::{AudioBlock, Demo, Key, KeyHandler};
pub use master::MasterBus;
pub use registry::{DemoContext, DemoRegistry, DemoSet};
pub use session::{AudioEngine, InputEvent, Session, SessionInput};
