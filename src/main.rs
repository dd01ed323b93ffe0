//! `crit`: extract acceptance criteria from tracker work-item exports.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
