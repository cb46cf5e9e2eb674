//! Core utilities for tstf tools.
//!
//! This crate provides shared functionality for transforming
//! JavaScript/TypeScript projects, including:
//! - Parsing modules into their imports, exports and declarations
//! - Resolving relative module specifiers to files
//! - Computing each file's exported declarations with stable identities
//! - Reading tsconfig path mappings and project file lists
//! - Glob expansion, path helpers and whole-file writes

mod collector;
mod constants;
mod error;
mod exports;
mod parser;
mod paths;
mod persist;
mod resolver;
mod tsconfig;
mod types;

// Re-export public API
pub use collector::{collect_sources, expand_globs};
pub use constants::{BARREL_EXTENSIONS, INDEX_FILES, JS_TS_EXTENSIONS, RESOLVE_EXTENSIONS};
pub use error::TstfError;
pub use exports::{DeclTable, ExportLoader};
pub use parser::{module_info_for, parse_module_info, specifier_sites};
pub use paths::{make_relative, relativize_to_cwd, to_slash};
pub use persist::write_atomically;
pub use resolver::{is_relative, resolve};
pub use tsconfig::{CompilerOptions, PathMapping, TsConfig, strip_json_comments};
pub use types::{
    DeclId, DeclKey, DeclOrigin, DeclSpace, ExportEntry, ExportedDeclarations, ImportBinding,
    Imported, LocalDecl, ModuleInfo, QuoteStyle, SpecifierSite, Verbosity,
};
