use std::io::{self, Write};

use colored::Colorize;
use log::debug;
use tstf_core::relativize_to_cwd;

use crate::types::GenIndexResult;

/// Print the generated barrel text as it would be written.
pub fn print_preview<W: Write>(writer: &mut W, result: &GenIndexResult) -> io::Result<()> {
    debug!("Printing preview of {}", result.output_file.display());
    writeln!(writer, "{}", result.text)?;
    writer.flush()?;
    Ok(())
}

pub fn print_summary<W: Write>(writer: &mut W, result: &GenIndexResult) -> io::Result<()> {
    let target = relativize_to_cwd(&result.output_file);
    let lines = result.text.lines().count();

    if result.written {
        writeln!(
            writer,
            "{} Wrote {} ({} lines)",
            "✓".green().bold(),
            target.blue(),
            lines.to_string().cyan()
        )?;
    } else {
        writeln!(
            writer,
            "{} Preview of {} ({} lines), pass {} to write it",
            "●".bright_blue(),
            target.blue(),
            lines.to_string().cyan(),
            "--write".bold()
        )?;
    }

    if !result.conflicts.is_empty() {
        writeln!(
            writer,
            "{} {} overloaded names were qualified:",
            "⚠".yellow().bold(),
            result.conflicts.len().to_string().yellow().bold()
        )?;
        for conflict in &result.conflicts {
            writeln!(
                writer,
                "  {} {} {}",
                conflict.name.bold(),
                "from".dimmed(),
                conflict.origins.join(", ")
            )?;
        }
    }

    writer.flush()?;
    Ok(())
}
