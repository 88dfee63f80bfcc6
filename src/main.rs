use clap::Parser;
use dusk::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Transform(args) => dusk::cli::transform::run(args)?,
        Commands::Inspect(args) => dusk::cli::inspect::run(args)?,
        Commands::Completions(args) => dusk::cli::completions::run(args)?,
    }

    Ok(())
}
