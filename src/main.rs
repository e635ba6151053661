//! `reg`: manage a university registry from the command line.

use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
