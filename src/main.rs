// Sketchpad: draw with the mouse, clear, download as PNG.
// Logging: set RUST_LOG=debug (or trace) to see canvas and download activity.

use clap::Parser;
use sketchpad::config::{Args, Config};
use sketchpad::{app, Error};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::try_from(Args::parse())?;
    log::debug!("starting with {config:?}");
    app::run(config)
}
