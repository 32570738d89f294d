mod app;
mod cli;

use clap::Parser;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    app::run(Cli::parse())
}
