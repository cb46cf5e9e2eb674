use anyhow::{Context, Result, anyhow};
use log::{debug, info, trace, warn};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};
use tstf_core::{
    BARREL_EXTENSIONS, ExportLoader, QuoteStyle, collect_sources, expand_globs,
    write_atomically,
};

use crate::{
    config::Config,
    naming::{default_export_name, module_path_from},
    order::parent_first,
    registry::{ExportRegistry, Registration},
    types::{Conflict, GenIndexResult},
};

pub fn run_gen_index(cfg: &Config) -> Result<GenIndexResult> {
    info!("Starting index generation");

    let base = cfg.base_dir()?;
    let output_file = output_path(&base, &cfg.out)?;
    let out_dir = output_file.parent().unwrap_or(&base).to_path_buf();
    info!("Generating {}", output_file.display());

    let candidates = if cfg.src.is_empty() {
        debug!("No source globs given, collecting sources under {}", out_dir.display());
        collect_sources(&out_dir, BARREL_EXTENSIONS)?
    } else {
        expand_globs(&cfg.src, &base)?
    };
    let excluded: HashSet<PathBuf> = expand_globs(&cfg.exclude, &base)?.into_iter().collect();
    debug!("{} files excluded by pattern", excluded.len());

    let mut files: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|p| {
            if *p == output_file {
                trace!("Skipping the output file itself: {}", p.display());
                return false;
            }
            if excluded.contains(p) {
                trace!("Skipping excluded file: {}", p.display());
                return false;
            }
            // Only extensions a `from` specifier may omit can be re-exported cleanly
            p.extension().and_then(|e| e.to_str()).is_some_and(|e| BARREL_EXTENSIONS.contains(&e))
        })
        .collect();
    files.sort_by(|a, b| parent_first(a, b));

    if files.is_empty() {
        return Err(anyhow!("No source files found for {}", output_file.display()));
    }
    info!("Found {} source files", files.len());

    // Excluded files may still be the target of a re-export; they are never read
    let mut loader = ExportLoader::with_opaque(excluded);
    loader.preload(&files)?;
    debug!("Parsed {} files", loader.files_parsed());

    let (text, conflicts) = generate_index(&files, &out_dir, cfg.quote, &mut loader)?;

    let written = if cfg.write {
        write_atomically(&output_file, &text)?;
        info!("Wrote {}", output_file.display());
        true
    } else {
        false
    };

    Ok(GenIndexResult { text, output_file, files, conflicts, written })
}

/// Build the barrel text for `files`, which must already be in parent-first order.
pub fn generate_index(
    files: &[PathBuf],
    out_dir: &Path,
    quote: QuoteStyle,
    loader: &mut ExportLoader,
) -> Result<(String, Vec<Conflict>)> {
    let mut registry = ExportRegistry::new();
    let mut conflicts = Vec::new();

    for file in files {
        let exports = loader.exported_declarations(file)?;
        let from = module_path_from(out_dir, file);
        trace!("Registering {} exported names from {}", exports.len(), from);

        for (exported, ids) in exports.iter() {
            let name =
                if exported == "default" { default_export_name(file) } else { exported.clone() };

            for &id in ids {
                match registry.register(&name, exported, id, &from) {
                    Registration::Fresh => {
                        debug!("export {{ {} }} from {}", clause(exported, &name), from);
                    }
                    Registration::AlsoExportedAs(others) => {
                        debug!(
                            "export {{ {} }} from {}: {} is also exported as {}",
                            clause(exported, &name),
                            from,
                            loader.decl(id),
                            others.join(", ")
                        );
                    }
                    Registration::Duplicate { first_from } => {
                        debug!("'{}' from {} is already exported from {}", name, from, first_from);
                    }
                    Registration::SameFile => {
                        debug!("'{}' has more than one declaration in {}", name, from);
                    }
                    Registration::Conflict { previous } => {
                        warn!(
                            "export {{ {} }} from {} conflicts with {}, qualifying every occurrence",
                            clause(exported, &name),
                            from,
                            previous.join(", ")
                        );
                        let mut origins = previous;
                        origins.push(from.clone());
                        conflicts.push(Conflict { name: name.clone(), origins });
                    }
                }
            }
        }
    }

    Ok((registry.render(quote).join("\n"), conflicts))
}

fn clause(exported: &str, name: &str) -> String {
    if exported == name { name.to_string() } else { format!("{} as {}", exported, name) }
}

/// The output file as an absolute path; its directory must already exist.
fn output_path(base: &Path, out: &Path) -> Result<PathBuf> {
    let joined = base.join(out);
    let file_name = joined
        .file_name()
        .with_context(|| format!("Output path {} does not name a file", out.display()))?;
    let dir = joined.parent().unwrap_or(base);
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Output directory {} does not exist", dir.display()))?;
    Ok(dir.join(file_name))
}
