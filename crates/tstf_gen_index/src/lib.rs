//! Barrel file generation for JavaScript/TypeScript projects.
//!
//! Every exported member of the selected source files is re-exported from a
//! single index file. Declarations reachable under the same name through
//! several files are emitted once, from the first file in parent-first order.
//! A name bound to two different declarations is qualified with a prefix
//! derived from each file's path (`foo as aFoo`, `foo as bFoo`).
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//! use std::io::{BufWriter, Write};
//! use tstf_gen_index::{Config, print_preview, run_gen_index};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::parse_from(["gen-index", "src/**/*.ts", "-o", "src/index.ts"]);
//! let result = run_gen_index(&cfg)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! print_preview(&mut stdout, &result)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod generator;
mod naming;
mod order;
mod registry;
mod reporter;
mod types;

// Re-export public API
pub use config::Config;
pub use generator::{generate_index, run_gen_index};
pub use reporter::{print_preview, print_summary};
pub use types::{Conflict, GenIndexResult};
