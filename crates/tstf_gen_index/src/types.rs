use std::path::PathBuf;

/// One export name bound to distinct declarations in different files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub name: String,
    /// `from` paths of every origin the name was seen in so far, in
    /// processing order
    pub origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GenIndexResult {
    /// The generated barrel text, one `export { … } from …;` line per origin
    pub text: String,
    pub output_file: PathBuf,
    /// Input files in processing (parent-first) order
    pub files: Vec<PathBuf>,
    pub conflicts: Vec<Conflict>,
    pub written: bool,
}
