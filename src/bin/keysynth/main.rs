//! keysynth - play the bundled demos from the computer keyboard
//!
//! Run with: cargo run --release -- [samples-dir]

mod audio;
mod input;

use std::sync::Arc;

use keysynth::{demos, engine::DemoContext, io::SampleLibrary, EngineConfig, Session};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let mut config = EngineConfig::default();
    if let Some(dir) = std::env::args().nth(1) {
        config = config.samples_dir(dir);
    }

    let output = audio::Output::open()?;
    let samples = SampleLibrary::load_dir(&config.samples_dir, output.channels, output.sample_rate);
    log::info!(
        "loaded {} samples from {}",
        samples.len(),
        config.samples_dir.display()
    );

    let context = DemoContext::new(output.channels, output.sample_rate, Arc::new(samples));
    let demos = demos::default_registry().build(&context);
    let (engine, session) = Session::new(config, demos);
    log::info!("{} demos ready", engine.demo_count());

    // dropping the stream stops playback
    let _stream = output.start(engine)?;
    input::run(session)
}
