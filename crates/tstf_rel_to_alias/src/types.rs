use std::path::PathBuf;

/// One relative specifier replaced by an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdit {
    pub file: PathBuf,
    pub old_specifier: String,
    pub new_specifier: String,
    /// The full import/export statement before and after the rewrite
    pub old_statement: String,
    pub new_statement: String,
}

#[derive(Debug, Clone)]
pub struct RelToAliasResult {
    /// Every rewrite, in file order then source order
    pub edits: Vec<ImportEdit>,
    pub files_analyzed: usize,
    pub files_changed: usize,
    pub written: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct FileRewrite {
    pub(crate) file: PathBuf,
    pub(crate) edits: Vec<ImportEdit>,
    pub(crate) output: String,
}
