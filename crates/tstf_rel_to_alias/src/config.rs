use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use std::{env, path::PathBuf};
use tstf_core::{QuoteStyle, Verbosity};

#[derive(Debug, Clone, Parser)]
#[command(name = "rel-to-alias")]
#[command(about = "Rewrite relative import paths to tsconfig path aliases")]
pub struct Config {
    /// Path to the tsconfig file declaring `baseUrl` and `paths`
    #[arg(short, long, default_value = "tsconfig.json")]
    pub project: PathBuf,

    /// Quote style for rewritten module specifiers
    #[arg(short, long, value_enum, default_value_t = QuoteStyle::Double)]
    pub quote: QuoteStyle,

    /// Write changed files instead of only listing the rewrites
    #[arg(short, long)]
    pub write: bool,

    /// Logging verbosity
    #[arg(short, long, value_enum, default_value_t = Verbosity::Log)]
    pub verbose: Verbosity,
}

impl Config {
    /// The tsconfig path made absolute against the current directory
    pub fn config_path(&self) -> Result<PathBuf> {
        let cwd = env::current_dir().context("Failed to get current directory")?;
        let path = cwd.join(&self.project);
        debug!("Using tsconfig at: {}", path.display());
        Ok(path.canonicalize().unwrap_or(path))
    }
}
