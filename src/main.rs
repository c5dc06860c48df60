mod assets;
mod cli;
mod clipboard;
mod commands;
mod composer;
mod config;
mod export;
mod logging;
mod notification;
mod router;
mod serve;
mod session;
mod timers;
mod utils;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.debug)?;
    commands::run(cli)
}
