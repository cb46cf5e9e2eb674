//! Rewrite relative import specifiers to tsconfig path aliases.
//!
//! `compilerOptions.baseUrl` and `compilerOptions.paths` are turned into an
//! ordered table of absolute directories. Every relative specifier in an
//! import or export-from statement of the project is resolved against its
//! file, and the first directory that prefixes the result is replaced by its
//! alias (`../utils/format` → `app/utils/format`).
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//! use std::io::{BufWriter, Write};
//! use tstf_rel_to_alias::{Config, print_edits, run_rel_to_alias};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::parse_from(["rel-to-alias", "-p", "tsconfig.json", "-q", "single"]);
//! let result = run_rel_to_alias(&cfg)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! print_edits(&mut stdout, &result.edits)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod alias_table;
mod config;
mod reporter;
mod rewriter;
mod transformer;
mod types;

// Re-export public API
pub use alias_table::{AliasEntry, AliasTable};
pub use config::Config;
pub use reporter::{print_edits, print_summary};
pub use rewriter::rewrite_source;
pub use transformer::run_rel_to_alias;
pub use types::{ImportEdit, RelToAliasResult};
