use std::{cmp::Ordering, path::Path};

/// Parent-first ordering of source files.
///
/// Directories compare component by component, so a directory sorts before
/// everything below it. Within one directory `index.*` comes first, then
/// paths in lexicographic order.
pub(crate) fn parent_first(a: &Path, b: &Path) -> Ordering {
    let a_dir = a.parent().unwrap_or(Path::new(""));
    let b_dir = b.parent().unwrap_or(Path::new(""));

    a_dir
        .components()
        .cmp(b_dir.components())
        .then_with(|| is_index(b).cmp(&is_index(a)))
        .then_with(|| a.cmp(b))
}

fn is_index(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with("index."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sorted(paths: &[&str]) -> Vec<String> {
        let mut v: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        v.sort_by(|a, b| parent_first(a, b));
        v.iter().map(|p| p.to_string_lossy().to_string()).collect()
    }

    #[test]
    fn test_index_before_siblings() {
        assert_eq!(
            sorted(&["/p/src/b.ts", "/p/src/index.ts", "/p/src/a.ts"]),
            vec!["/p/src/index.ts", "/p/src/a.ts", "/p/src/b.ts"]
        );
    }

    #[test]
    fn test_parent_directory_before_child() {
        assert_eq!(
            sorted(&["/p/src/widgets/index.ts", "/p/src/z.ts", "/p/src/widgets/button/x.ts"]),
            vec!["/p/src/z.ts", "/p/src/widgets/index.ts", "/p/src/widgets/button/x.ts"]
        );
    }

    #[test]
    fn test_unrelated_directories_are_lexicographic() {
        assert_eq!(
            sorted(&["/p/src/b/x.ts", "/p/src/a/y.ts", "/p/src/a/index.tsx"]),
            vec!["/p/src/a/index.tsx", "/p/src/a/y.ts", "/p/src/b/x.ts"]
        );
    }

    #[test]
    fn test_order_is_independent_of_input_order() {
        let a = sorted(&["/p/c/d.ts", "/p/a.ts", "/p/c/index.ts", "/p/b/e.ts"]);
        let b = sorted(&["/p/b/e.ts", "/p/c/index.ts", "/p/a.ts", "/p/c/d.ts"]);
        assert_eq!(a, b);
        assert_eq!(a, vec!["/p/a.ts", "/p/b/e.ts", "/p/c/index.ts", "/p/c/d.ts"]);
    }
}
