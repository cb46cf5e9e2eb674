use std::{collections::BTreeMap, collections::HashMap, fmt, path::PathBuf};

use clap::ValueEnum;
use log::LevelFilter;

/// Quote character used when printing module specifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QuoteStyle {
    #[value(alias = "s")]
    Single,
    #[default]
    #[value(alias = "d")]
    Double,
}

impl QuoteStyle {
    pub fn quote(self, text: &str) -> String {
        match self {
            QuoteStyle::Single => format!("'{}'", text),
            QuoteStyle::Double => format!("\"{}\"", text),
        }
    }
}

/// Diagnostic verbosity, ordered `debug < log < warn < error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum)]
pub enum Verbosity {
    Debug,
    #[default]
    Log,
    Warn,
    Error,
}

impl Verbosity {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Log => LevelFilter::Info,
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Error => LevelFilter::Error,
        }
    }

    /// Whether `log`-level reports (previews, rewrite diffs) should be shown.
    pub fn shows_reports(self) -> bool {
        self <= Verbosity::Log
    }
}

/// Handle to one exported entity, interned per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclId(pub(crate) u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// TypeScript keeps types and values in separate declaration spaces, so
/// `interface Foo` and `const Foo` are two entities sharing a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeclSpace {
    Type,
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeclOrigin {
    /// Declared in (or only known through) a resolved source file
    Module(PathBuf),
    /// Imported from a bare specifier that is not resolved on disk
    Package(String),
}

/// Structural identity of a declaration: where it lives, its local name and
/// its declaration space. `*` names a module namespace object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclKey {
    pub origin: DeclOrigin,
    pub name: String,
    pub space: DeclSpace,
}

impl fmt::Display for DeclKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let space = match self.space {
            DeclSpace::Type => "type",
            DeclSpace::Value => "value",
        };
        match &self.origin {
            DeclOrigin::Module(path) => write!(f, "{} {} in {}", space, self.name, path.display()),
            DeclOrigin::Package(pkg) => write!(f, "{} {} in '{}'", space, self.name, pkg),
        }
    }
}

/// Exported name → every declaration reachable under that name.
pub type ExportedDeclarations = BTreeMap<String, Vec<DeclId>>;

/// What an import binding or re-export refers to in its source module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imported {
    Name(String),
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub source: String,
    pub imported: Imported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDecl {
    pub name: String,
    pub space: DeclSpace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
    /// `export const x`, `export { a as b }`
    Local { exported: String, local: String },
    /// `export default x` (named local) or `export default <expr>` (None)
    Default { local: Option<String> },
    /// `export { a as b } from "./m"`, `export * as ns from "./m"`
    Reexport { exported: String, source: String, imported: Imported },
    /// `export * from "./m"`
    Star { source: String },
}

/// Owned summary of one parsed module, detached from the parser arena.
#[derive(Debug, Clone, Default)]
pub struct ModuleInfo {
    pub locals: Vec<LocalDecl>,
    pub imports: HashMap<String, ImportBinding>,
    pub exports: Vec<ExportEntry>,
}

/// A module specifier string literal inside an import/export statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecifierSite {
    pub value: String,
    /// Byte range of the literal, quotes included
    pub literal: (usize, usize),
    /// Byte range of the whole statement
    pub statement: (usize, usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_styles() {
        assert_eq!(QuoteStyle::Single.quote("./a"), "'./a'");
        assert_eq!(QuoteStyle::Double.quote("./a"), "\"./a\"");
    }

    #[test]
    fn test_verbosity_ordering() {
        assert!(Verbosity::Debug.shows_reports());
        assert!(Verbosity::Log.shows_reports());
        assert!(!Verbosity::Warn.shows_reports());
        assert_eq!(Verbosity::Log.level_filter(), LevelFilter::Info);
        assert_eq!(Verbosity::Error.level_filter(), LevelFilter::Error);
    }
}
