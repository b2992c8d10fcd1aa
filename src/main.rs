mod app;
mod config;
mod data;
mod error;
mod stats;
mod ui;

use std::io;
use std::path::Path;

use anyhow::Result;

use app::BikeshareApp;
use config::Config;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load(Path::new("."))?;
    let stdin = io::stdin();

    BikeshareApp::new(config, stdin.lock(), io::stdout()).run()
}
