pub mod completions;
pub mod inspect;
pub mod transform;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::config::{Config, ConfigFile};
use crate::error::Result;

/// dusk - dark-mode stylesheet generator
#[derive(Parser, Debug)]
#[command(name = "dusk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite stylesheets with generated dark-mode variable blocks
    Transform(transform::TransformArgs),

    /// Report the colors a stylesheet would contribute
    Inspect(inspect::InspectArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Load a config file when given, defaults otherwise.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(ConfigFile::load(path)?.resolve()),
        None => Ok(Config::default()),
    }
}
