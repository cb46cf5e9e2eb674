use dashmap::DashMap;
use log::{debug, trace};
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::constants::{INDEX_FILES, RESOLVE_EXTENSIONS};

/// Whether a module specifier is relative to the importing file.
pub fn is_relative(request: &str) -> bool {
    request.starts_with('.')
}

/// Resolve a relative (or absolute) specifier written in `from_file` to a
/// source file on disk. Bare specifiers resolve to `None`.
pub fn resolve(
    from_file: &Path,
    request: &str,
    cache: &DashMap<(PathBuf, String), Option<PathBuf>>,
) -> Option<PathBuf> {
    let key = (from_file.to_path_buf(), request.to_string());
    if let Some(v) = cache.get(&key) {
        trace!("Cache hit for resolve: '{}' from {}", request, from_file.display());
        return v.clone();
    }
    trace!("Resolving: '{}' from {}", request, from_file.display());

    let resolved = if is_relative(request) || request.starts_with('/') {
        let base = from_file.parent().unwrap_or(Path::new("/"));
        let p = clean(base.join(request));
        let result = resolve_file(&p);
        if result.is_none() {
            trace!("Failed to resolve relative import '{}'", request);
        }
        result
    } else {
        trace!("Not resolving bare specifier '{}'", request);
        None
    };

    cache.insert(key, resolved.clone());
    if let Some(r) = &resolved {
        debug!("Resolved '{}' from {} to {}", request, from_file.display(), r.display());
    }
    resolved
}

fn resolve_file(p: &Path) -> Option<PathBuf> {
    // Try exact path first
    if p.is_file() {
        return Some(canonical(p.to_path_buf()));
    }

    // Try adding extensions
    for ext in RESOLVE_EXTENSIONS {
        let candidate = PathBuf::from(format!("{}.{}", p.display(), ext));
        if candidate.is_file() {
            return Some(canonical(candidate));
        }
    }

    // ESM-style TypeScript imports name the emitted `.js` file
    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
        let substitutes: &[&str] = match ext {
            "js" => &["ts", "tsx"],
            "jsx" => &["tsx"],
            "mjs" => &["mts"],
            "cjs" => &["cts"],
            _ => &[],
        };
        for sub in substitutes {
            let candidate = p.with_extension(sub);
            if candidate.is_file() {
                return Some(canonical(candidate));
            }
        }
    }

    // Try index files
    for index_file in INDEX_FILES {
        let candidate = p.join(index_file);
        if candidate.is_file() {
            return Some(canonical(candidate));
        }
    }

    None
}

fn canonical(p: PathBuf) -> PathBuf {
    p.canonicalize().unwrap_or(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path.canonicalize().unwrap()
    }

    #[test]
    fn test_resolve_with_extension_probe() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let from = create_test_file(root, "src/index.ts", "");
        let target = create_test_file(root, "src/utils/format.ts", "");
        let cache = DashMap::new();

        assert_eq!(resolve(&from, "./utils/format", &cache), Some(target));
    }

    #[test]
    fn test_resolve_directory_index() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let from = create_test_file(root, "src/app/main.ts", "");
        let target = create_test_file(root, "src/widgets/index.tsx", "");
        let cache = DashMap::new();

        assert_eq!(resolve(&from, "../widgets", &cache), Some(target));
    }

    #[test]
    fn test_resolve_js_extension_to_ts_source() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let from = create_test_file(root, "src/index.ts", "");
        let target = create_test_file(root, "src/a.ts", "");
        let cache = DashMap::new();

        assert_eq!(resolve(&from, "./a.js", &cache), Some(target));
    }

    #[test]
    fn test_bare_specifier_unresolved() {
        let temp_dir = TempDir::new().unwrap();
        let from = create_test_file(temp_dir.path(), "src/index.ts", "");
        let cache = DashMap::new();

        assert_eq!(resolve(&from, "react", &cache), None);
        assert_eq!(resolve(&from, "./missing", &cache), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_is_relative() {
        assert!(is_relative("./a"));
        assert!(is_relative("../a"));
        assert!(!is_relative("@app/a"));
        assert!(!is_relative("react"));
    }
}
