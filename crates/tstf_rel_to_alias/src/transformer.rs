use anyhow::Result;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::Path;
use tstf_core::{TsConfig, write_atomically};

use crate::{
    alias_table::AliasTable,
    config::Config,
    rewriter::rewrite_file,
    types::{FileRewrite, RelToAliasResult},
};

pub fn run_rel_to_alias(cfg: &Config) -> Result<RelToAliasResult> {
    info!("Starting relative-to-alias rewrite");

    let config_path = cfg.config_path()?;
    let tsconfig = TsConfig::load(&config_path)?;
    let mapping = tsconfig.path_mapping(&config_path)?;
    let config_dir = config_path.parent().unwrap_or(Path::new("/"));
    debug!("baseUrl = {}, quote = {:?}", mapping.base_url, cfg.quote);

    let table = AliasTable::build(config_dir, &mapping);
    if table.is_empty() {
        warn!("No path aliases declared in {}", config_path.display());
    }

    let files = tsconfig.project_files(config_dir)?;
    info!("Processing {} project files", files.len());

    // Every file must parse before anything is written
    let rewrites: Vec<FileRewrite> =
        files.par_iter().map(|file| rewrite_file(file, &table, cfg.quote)).collect::<Result<_>>()?;

    let changed: Vec<&FileRewrite> = rewrites.iter().filter(|r| !r.edits.is_empty()).collect();
    debug!("{} of {} files have aliasable specifiers", changed.len(), rewrites.len());

    if cfg.write {
        for rewrite in &changed {
            write_atomically(&rewrite.file, &rewrite.output)?;
        }
        info!("Wrote {} files", changed.len());
    }

    Ok(RelToAliasResult {
        files_analyzed: files.len(),
        files_changed: changed.len(),
        edits: rewrites.into_iter().flat_map(|r| r.edits).collect(),
        written: cfg.write,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};
    use tempfile::TempDir;
    use tstf_core::{QuoteStyle, TstfError, Verbosity};

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn config(root: &Path, write: bool) -> Config {
        Config {
            project: root.join("tsconfig.json"),
            quote: QuoteStyle::Double,
            write,
            verbose: Verbosity::Log,
        }
    }

    const TSCONFIG: &str = r#"{
  // comments are allowed
  "compilerOptions": {
    "baseUrl": ".",
    "paths": { "app/*": ["src/app/*"] },
  },
}"#;

    #[test]
    fn test_alias_rewrite_in_write_mode() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "tsconfig.json", TSCONFIG);
        create_test_file(root, "src/app/utils/format.ts", "export const format = 1;\n");
        let button = create_test_file(
            root,
            "src/app/widgets/button.ts",
            "import { format } from '../utils/format';\nexport const b = format;\n",
        );

        let result = run_rel_to_alias(&config(root, true)).unwrap();
        assert_eq!(result.edits.len(), 1);
        assert_eq!(result.files_changed, 1);
        assert_eq!(result.files_analyzed, 2);
        assert_eq!(
            fs::read_to_string(&button).unwrap(),
            "import { format } from \"app/utils/format\";\nexport const b = format;\n"
        );
    }

    #[test]
    fn test_base_url_is_relative_to_config() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "tsconfig.json",
            r#"{ "compilerOptions": { "baseUrl": "src", "paths": { "app/*": ["app/*"] } } }"#,
        );
        create_test_file(root, "src/app/widgets/button.ts", "export * from '../utils/format';\n");

        let result = run_rel_to_alias(&config(root, false)).unwrap();
        assert_eq!(result.edits[0].new_specifier, "app/utils/format");
        assert_eq!(result.edits[0].new_statement, "export * from \"app/utils/format\";");
    }

    #[test]
    fn test_preview_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "tsconfig.json", TSCONFIG);
        let src = "import { a } from './a';\n";
        let file = create_test_file(root, "src/app/index.ts", src);

        let result = run_rel_to_alias(&config(root, false)).unwrap();
        assert_eq!(result.edits.len(), 1);
        assert!(!result.written);
        assert_eq!(fs::read_to_string(&file).unwrap(), src);
    }

    #[test]
    fn test_unmatched_files_are_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "tsconfig.json", TSCONFIG);
        let src = "import   x from \"../lib/x\" // keep\n;import y from 'y';\n";
        let file = create_test_file(root, "src/main.ts", src);
        create_test_file(root, "src/lib/x.ts", "export default 1;\n");

        let result = run_rel_to_alias(&config(root, true)).unwrap();
        assert!(result.edits.is_empty());
        assert_eq!(fs::read_to_string(&file).unwrap(), src);
    }

    #[test]
    fn test_parse_error_aborts_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "tsconfig.json", TSCONFIG);
        let src = "import { a } from './a';\n";
        let good = create_test_file(root, "src/app/good.ts", src);
        create_test_file(root, "src/app/broken.ts", "import {");

        assert!(run_rel_to_alias(&config(root, true)).is_err());
        assert_eq!(fs::read_to_string(&good).unwrap(), src);
    }

    #[test]
    fn test_missing_paths_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "tsconfig.json", r#"{ "compilerOptions": { "baseUrl": "." } }"#);

        let err = run_rel_to_alias(&config(root, false)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TstfError>(),
            Some(TstfError::MissingCompilerOption { field: "paths", .. })
        ));
    }
}
