use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;
use tstf_core::Verbosity;

#[derive(Parser)]
#[command(name = "tstf")]
#[command(about = "Source transformations for TypeScript projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a barrel file re-exporting every exported member
    GenIndex(tstf_gen_index::Config),
    /// Rewrite relative imports to tsconfig path aliases
    RelToAlias(tstf_rel_to_alias::Config),
}

impl Commands {
    fn verbosity(&self) -> Verbosity {
        match self {
            Commands::GenIndex(cfg) => cfg.verbose,
            Commands::RelToAlias(cfg) => cfg.verbose,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = cli.command.verbosity();
    env_logger::Builder::new().filter_level(verbosity.level_filter()).parse_default_env().init();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let start = Instant::now();
    let num_threads = rayon::current_num_threads();

    let files = match cli.command {
        Commands::GenIndex(cfg) => {
            info!("Generating index {} (using {} threads)", cfg.out.display(), num_threads);
            let result = tstf_gen_index::run_gen_index(&cfg)?;
            debug!("{} conflicts resolved", result.conflicts.len());

            if !result.written {
                tstf_gen_index::print_preview(&mut stdout, &result)?;
            }
            if verbosity.shows_reports() {
                tstf_gen_index::print_summary(&mut stdout, &result)?;
            }
            result.files.len()
        }
        Commands::RelToAlias(cfg) => {
            info!("Aliasing imports for {} (using {} threads)", cfg.project.display(), num_threads);
            let result = tstf_rel_to_alias::run_rel_to_alias(&cfg)?;
            debug!("Found {} rewrites", result.edits.len());

            if verbosity.shows_reports() {
                tstf_rel_to_alias::print_edits(&mut stdout, &result.edits)?;
                tstf_rel_to_alias::print_summary(&mut stdout, &result)?;
            }
            result.files_analyzed
        }
    };

    if verbosity.shows_reports() {
        writeln!(
            stdout,
            "\n{} Finished in {}ms on {} files (using {} threads).",
            "●".bright_blue(),
            start.elapsed().as_millis().to_string().cyan(),
            files.to_string().cyan(),
            num_threads.to_string().cyan()
        )?;
    }
    stdout.flush()?;

    Ok(())
}
