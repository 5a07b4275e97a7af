use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = rotary::cli::Cli::parse();
    cli.run()
}
