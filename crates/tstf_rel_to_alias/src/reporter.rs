use std::io::{self, Write};

use colored::Colorize;
use log::debug;
use tstf_core::relativize_to_cwd;

use crate::types::{ImportEdit, RelToAliasResult};

/// Numbered before/after listing of every rewritten statement.
pub fn print_edits<W: Write>(writer: &mut W, edits: &[ImportEdit]) -> io::Result<()> {
    debug!("Printing {} edits", edits.len());
    for (idx, edit) in edits.iter().enumerate() {
        writeln!(
            writer,
            "{} {}:",
            (idx + 1).to_string().bold(),
            relativize_to_cwd(&edit.file).blue()
        )?;
        writeln!(writer, "     {}", single_line(&edit.old_statement).red())?;
        writeln!(writer, "  {} {}", "->".dimmed(), single_line(&edit.new_statement).green())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn print_summary<W: Write>(writer: &mut W, result: &RelToAliasResult) -> io::Result<()> {
    if result.edits.is_empty() {
        writeln!(writer, "{} No relative imports to alias", "✓".green().bold())?;
    } else if result.written {
        writeln!(
            writer,
            "{} Rewrote {} imports in {} files",
            "✓".green().bold(),
            result.edits.len().to_string().cyan(),
            result.files_changed.to_string().cyan()
        )?;
    } else {
        writeln!(
            writer,
            "{} {} imports in {} files would be rewritten, pass {} to apply",
            "●".bright_blue(),
            result.edits.len().to_string().cyan(),
            result.files_changed.to_string().cyan(),
            "--write".bold()
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn single_line(statement: &str) -> String {
    statement.split_whitespace().collect::<Vec<_>>().join(" ")
}
