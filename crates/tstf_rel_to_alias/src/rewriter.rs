use anyhow::{Context, Result};
use log::{debug, trace};
use std::{fs, path::Path};
use tstf_core::{QuoteStyle, SpecifierSite, is_relative, specifier_sites};

use crate::{
    alias_table::AliasTable,
    types::{FileRewrite, ImportEdit},
};

pub(crate) fn rewrite_file(file: &Path, table: &AliasTable, quote: QuoteStyle) -> Result<FileRewrite> {
    trace!("Rewriting specifiers in {}", file.display());
    let src =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let (output, edits) = rewrite_source(file, &src, table, quote)?;
    Ok(FileRewrite { file: file.to_path_buf(), edits, output })
}

/// Rewrite every relative specifier in `src` that falls under an alias.
///
/// Only the specifier literals change; the rest of the text is returned
/// byte for byte.
pub fn rewrite_source(
    file: &Path,
    src: &str,
    table: &AliasTable,
    quote: QuoteStyle,
) -> Result<(String, Vec<ImportEdit>)> {
    let dir = file.parent().unwrap_or(Path::new("/"));
    let sites = specifier_sites(file, src)?;
    let mut replacements: Vec<(&SpecifierSite, String)> = Vec::new();

    for site in &sites {
        if !is_relative(&site.value) {
            continue;
        }
        let Some(aliased) = table.alias_for(dir, &site.value) else {
            debug!("No alias matches '{}' in {}", site.value, file.display());
            continue;
        };
        let literal = quote.quote(&aliased);
        if literal == src[site.literal.0..site.literal.1] {
            continue;
        }
        replacements.push((site, literal));
    }

    let edits: Vec<ImportEdit> = replacements
        .iter()
        .map(|(site, literal)| {
            let (start, end) = site.statement;
            let old_statement = &src[start..end];
            let mut new_statement = old_statement.to_string();
            new_statement.replace_range(site.literal.0 - start..site.literal.1 - start, literal);
            ImportEdit {
                file: file.to_path_buf(),
                old_specifier: site.value.clone(),
                new_specifier: literal[1..literal.len() - 1].to_string(),
                old_statement: old_statement.to_string(),
                new_statement,
            }
        })
        .collect();

    // Later offsets first so earlier ranges stay valid
    let mut output = src.to_string();
    replacements.sort_by(|a, b| b.0.literal.0.cmp(&a.0.literal.0));
    for (site, literal) in &replacements {
        output.replace_range(site.literal.0..site.literal.1, literal);
    }

    Ok((output, edits))
}
