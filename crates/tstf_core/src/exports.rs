//! Exported-declaration maps for source files.
//!
//! [`ExportLoader`] answers "which declarations does this file export, and
//! under which names", following re-export chains (`export { a } from`,
//! `export *`, import-then-export, `export default ident`) down to the module
//! that declares them. Declarations are interned into [`DeclId`]s so that the
//! same entity reached through different files compares equal.

use anyhow::Result;
use dashmap::DashMap;
use log::{debug, trace};
use rayon::prelude::*;
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    parser::module_info_for,
    resolver::resolve,
    types::{
        DeclId, DeclKey, DeclOrigin, DeclSpace, ExportEntry, ExportedDeclarations, Imported,
        ModuleInfo,
    },
};

/// Files on the current resolution path keyed by depth, and the shallowest
/// depth that a cycle cut below the current file reached back to.
struct Walk {
    depth: HashMap<PathBuf, usize>,
    low: usize,
}

/// Interner for declaration identities.
#[derive(Debug, Default)]
pub struct DeclTable {
    keys: Vec<DeclKey>,
    ids: HashMap<DeclKey, DeclId>,
}

impl DeclTable {
    pub fn intern(&mut self, key: DeclKey) -> DeclId {
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = DeclId(self.keys.len() as u32);
        self.keys.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    pub fn get(&self, id: DeclId) -> &DeclKey {
        &self.keys[id.index()]
    }
}

#[derive(Default)]
pub struct ExportLoader {
    decls: DeclTable,
    module_cache: DashMap<PathBuf, Arc<ModuleInfo>>,
    resolve_cache: DashMap<(PathBuf, String), Option<PathBuf>>,
    export_cache: HashMap<PathBuf, Arc<ExportedDeclarations>>,
    opaque: HashSet<PathBuf>,
}

impl ExportLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files in `opaque` are never read. Re-exports that point into them
    /// resolve to an identity keyed on the file and the imported name.
    pub fn with_opaque(opaque: HashSet<PathBuf>) -> Self {
        Self { opaque, ..Self::default() }
    }

    /// Parse `files` in parallel ahead of the sequential export resolution.
    pub fn preload(&self, files: &[PathBuf]) -> Result<()> {
        debug!("Preloading {} files", files.len());
        files.par_iter().try_for_each(|file| module_info_for(file, &self.module_cache).map(|_| ()))
    }

    pub fn decl(&self, id: DeclId) -> &DeclKey {
        self.decls.get(id)
    }

    pub fn files_parsed(&self) -> usize {
        self.module_cache.len()
    }

    pub fn exported_declarations(&mut self, file: &Path) -> Result<Arc<ExportedDeclarations>> {
        let mut walk = Walk { depth: HashMap::new(), low: usize::MAX };
        self.resolve_exports(file, &mut walk)
    }

    fn resolve_exports(
        &mut self,
        file: &Path,
        walk: &mut Walk,
    ) -> Result<Arc<ExportedDeclarations>> {
        if let Some(cached) = self.export_cache.get(file) {
            trace!("Cache hit for exports: {}", file.display());
            return Ok(Arc::clone(cached));
        }

        // Cyclic re-exports contribute nothing on the second visit
        if let Some(&depth) = walk.depth.get(file) {
            trace!("Cycle detected at: {}", file.display());
            walk.low = walk.low.min(depth);
            return Ok(Arc::new(ExportedDeclarations::new()));
        }
        let depth = walk.depth.len();
        walk.depth.insert(file.to_path_buf(), depth);
        let outer_low = std::mem::replace(&mut walk.low, usize::MAX);

        let module = module_info_for(file, &self.module_cache)?;
        let mut exported = ExportedDeclarations::new();
        let mut stars = Vec::new();

        for entry in &module.exports {
            match entry {
                ExportEntry::Local { exported: name, local } => {
                    let ids = self.local_declarations(file, &module, local, walk)?;
                    push_unique(exported.entry(name.clone()).or_default(), ids);
                }
                ExportEntry::Default { local } => {
                    let ids = match local {
                        Some(local) => self.local_declarations(file, &module, local, walk)?,
                        None => vec![self.module_decl(file, "default", DeclSpace::Value)],
                    };
                    push_unique(exported.entry("default".to_string()).or_default(), ids);
                }
                ExportEntry::Reexport { exported: name, source, imported } => {
                    let ids = self.imported_declarations(file, source, imported, walk)?;
                    if ids.is_empty() {
                        debug!(
                            "'{}' re-exported from '{}' in {} resolves to nothing",
                            name,
                            source,
                            file.display()
                        );
                        continue;
                    }
                    push_unique(exported.entry(name.clone()).or_default(), ids);
                }
                ExportEntry::Star { source } => stars.push(source.clone()),
            }
        }

        // Explicit exports shadow names coming through `export *`
        for source in stars {
            let Some(target) = resolve(file, &source, &self.resolve_cache) else {
                debug!("Cannot follow export * from '{}' in {}", source, file.display());
                continue;
            };
            if self.opaque.contains(&target) {
                trace!("Not following export * into excluded {}", target.display());
                continue;
            }
            let target_exports = self.resolve_exports(&target, walk)?;
            for (name, ids) in target_exports.iter() {
                if name == "default" || exported.contains_key(name) {
                    continue;
                }
                exported.insert(name.clone(), ids.clone());
            }
        }

        exported.retain(|_, ids| !ids.is_empty());
        walk.depth.remove(file);

        trace!("Resolved {} exported names in {}", exported.len(), file.display());
        let exported = Arc::new(exported);
        // A cycle cut at an ancestor leaves this result incomplete for other callers
        if walk.low >= depth {
            self.export_cache.insert(file.to_path_buf(), Arc::clone(&exported));
        } else {
            trace!("Not caching exports of {} inside an open cycle", file.display());
        }
        walk.low = walk.low.min(outer_low);
        Ok(exported)
    }

    fn local_declarations(
        &mut self,
        file: &Path,
        module: &ModuleInfo,
        local: &str,
        walk: &mut Walk,
    ) -> Result<Vec<DeclId>> {
        if let Some(binding) = module.imports.get(local) {
            return self.imported_declarations(file, &binding.source, &binding.imported, walk);
        }

        let mut spaces: Vec<DeclSpace> =
            module.locals.iter().filter(|d| d.name == local).map(|d| d.space).collect();
        spaces.sort();
        spaces.dedup();
        if spaces.is_empty() {
            // Ambient or global binding; still a distinct value of this file
            spaces.push(DeclSpace::Value);
        }

        Ok(spaces.into_iter().map(|space| self.module_decl(file, local, space)).collect())
    }

    fn imported_declarations(
        &mut self,
        file: &Path,
        source: &str,
        imported: &Imported,
        walk: &mut Walk,
    ) -> Result<Vec<DeclId>> {
        let name = match imported {
            Imported::Name(name) => name.as_str(),
            Imported::Namespace => "*",
        };

        let Some(target) = resolve(file, source, &self.resolve_cache) else {
            let key = DeclKey {
                origin: DeclOrigin::Package(source.to_string()),
                name: name.to_string(),
                space: DeclSpace::Value,
            };
            return Ok(vec![self.decls.intern(key)]);
        };

        if matches!(imported, Imported::Namespace) || self.opaque.contains(&target) {
            return Ok(vec![self.module_decl(&target, name, DeclSpace::Value)]);
        }

        let target_exports = self.resolve_exports(&target, walk)?;
        Ok(target_exports.get(name).cloned().unwrap_or_default())
    }

    fn module_decl(&mut self, file: &Path, name: &str, space: DeclSpace) -> DeclId {
        self.decls.intern(DeclKey {
            origin: DeclOrigin::Module(file.to_path_buf()),
            name: name.to_string(),
            space,
        })
    }
}

fn push_unique(ids: &mut Vec<DeclId>, new: Vec<DeclId>) {
    for id in new {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
}
