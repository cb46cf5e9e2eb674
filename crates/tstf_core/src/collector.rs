use anyhow::Result;
use ignore::WalkBuilder;
use log::{debug, trace};
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crate::error::TstfError;

/// Expand glob `patterns` (relative ones are anchored at `base`) into a
/// deduplicated set of existing files.
pub fn expand_globs(patterns: &[String], base: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();
    for pattern in patterns {
        let anchored = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            base.join(pattern).to_string_lossy().to_string()
        };
        trace!("Expanding glob: {}", anchored);
        let paths = glob::glob(&anchored)
            .map_err(|e| TstfError::Glob { pattern: pattern.clone(), message: e.to_string() })?;
        for p in paths {
            let p = p?;
            if p.is_file() {
                files.insert(canonical(p));
            }
        }
    }
    debug!("Expanded {} glob patterns to {} files", patterns.len(), files.len());
    Ok(files)
}

/// Every file below `dir` with one of `extensions`, honouring `.gitignore`.
pub fn collect_sources(dir: &Path, extensions: &[&str]) -> Result<BTreeSet<PathBuf>> {
    debug!("Walking directory tree from root: {}", dir.display());
    let mut files = BTreeSet::new();
    let walker = WalkBuilder::new(dir).hidden(false).ignore(true).git_ignore(true).build();

    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !p.is_file() {
            continue;
        }
        if let Some(ext) = p.extension().and_then(|e| e.to_str())
            && extensions.contains(&ext)
        {
            trace!("Found source file: {}", p.display());
            files.insert(canonical(p.to_path_buf()));
        }
    }
    debug!("Collected {} source files", files.len());
    Ok(files)
}

fn canonical(p: PathBuf) -> PathBuf {
    p.canonicalize().unwrap_or(p)
}
