use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use std::{env, path::PathBuf};
use tstf_core::{QuoteStyle, Verbosity};

#[derive(Debug, Clone, Parser)]
#[command(name = "gen-index")]
#[command(about = "Generate an index file re-exporting every exported module member")]
pub struct Config {
    /// Source file globs (defaults to every .ts/.tsx/.js/.jsx file next to the output)
    pub src: Vec<String>,

    /// Globs of files to exclude
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Path to the output file
    #[arg(short, long)]
    pub out: PathBuf,

    /// Write the output file instead of printing it
    #[arg(short, long)]
    pub write: bool,

    /// Quote style for generated module specifiers
    #[arg(short, long, value_enum, default_value_t = QuoteStyle::Double)]
    pub quote: QuoteStyle,

    /// Logging verbosity
    #[arg(short, long, value_enum, default_value_t = Verbosity::Log)]
    pub verbose: Verbosity,

    /// Directory that relative globs and the output path are resolved against
    /// (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl Config {
    /// The base directory for relative paths, made absolute
    pub fn base_dir(&self) -> Result<PathBuf> {
        let cwd = env::current_dir().context("Failed to get current directory")?;
        let base = match &self.root {
            Some(r) => {
                debug!("Using provided root directory: {:?}", r);
                cwd.join(r)
            }
            None => cwd,
        };
        Ok(base.canonicalize().unwrap_or(base))
    }
}
