use log::{debug, trace};
use path_clean::clean;
use std::path::Path;
use tstf_core::{PathMapping, to_slash};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    /// Absolute directory, `/`-separated
    pub dir: String,
    pub alias: String,
}

/// Absolute directory prefixes and the alias token that replaces each one.
///
/// Entries keep `paths` declaration order, and lookups take the first entry
/// whose directory is a string prefix of the resolved path. Overlapping
/// prefixes therefore resolve by declaration order, not by specificity.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    /// `baseUrl` is resolved against `config_dir`, and every target against `baseUrl`.
    pub fn build(config_dir: &Path, mapping: &PathMapping) -> Self {
        let base = clean(config_dir.join(&mapping.base_url));
        debug!("Alias base path: {}", base.display());

        let mut entries: Vec<AliasEntry> = Vec::new();
        for (pattern, targets) in &mapping.paths {
            let alias = strip_wildcard(pattern);
            for target in targets {
                let dir = to_slash(&clean(base.join(strip_wildcard(target))));
                debug!("{} -> {}", alias, dir);
                // A directory mapped twice keeps its place and takes the later alias
                match entries.iter_mut().find(|e| e.dir == dir) {
                    Some(existing) => existing.alias = alias.to_string(),
                    None => entries.push(AliasEntry { dir, alias: alias.to_string() }),
                }
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aliased form of the relative specifier `rel` written in a file in `dir`.
    pub fn alias_for(&self, dir: &Path, rel: &str) -> Option<String> {
        let abs = to_slash(&clean(dir.join(rel)));
        let entry = self.entries.iter().find(|e| abs.starts_with(&e.dir))?;
        trace!("'{}' matches {} -> {}", rel, entry.dir, entry.alias);
        Some(format!("{}{}", entry.alias, &abs[entry.dir.len()..]))
    }
}

fn strip_wildcard(pattern: &str) -> &str {
    pattern.strip_suffix("/*").unwrap_or(pattern)
}
