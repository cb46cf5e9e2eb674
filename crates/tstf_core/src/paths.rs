use log::{debug, trace};
use std::{
    env,
    path::{Component, Path, PathBuf},
};

/// Relativize an absolute path to the current working directory for display.
pub fn relativize_to_cwd(path: &Path) -> String {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(_) => {
            debug!("Failed to get current directory");
            return path.display().to_string();
        }
    };
    trace!("Relativizing {:?} to cwd {:?}", path, cwd);

    match make_relative(path, &cwd) {
        Some(rel) => rel.to_string_lossy().to_string(),
        None => path.display().to_string(),
    }
}

/// Path from `base` to `target`, or `None` when they do not share a root.
pub fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let target: Vec<Component> = target.components().collect();
    let base: Vec<Component> = base.components().collect();
    if target.first() != base.first() {
        return None;
    }

    let common = target.iter().zip(&base).take_while(|(t, b)| t == b).count();
    let mut rel: PathBuf = base[common..].iter().map(|_| Component::ParentDir).collect();
    for component in &target[common..] {
        match component {
            Component::Normal(part) => rel.push(part),
            Component::ParentDir => rel.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if rel.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(rel) }
}

/// Forward-slash form of a path, as written in module specifiers.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(target: &str, base: &str) -> Option<String> {
        make_relative(Path::new(target), Path::new(base)).map(|p| to_slash(&p))
    }

    #[test]
    fn test_barrel_siblings_and_children() {
        assert_eq!(rel("/app/src/a.ts", "/app/src").as_deref(), Some("a.ts"));
        assert_eq!(rel("/app/src/widgets/button.tsx", "/app/src").as_deref(), Some("widgets/button.tsx"));
    }

    #[test]
    fn test_paths_above_the_base() {
        assert_eq!(rel("/app/lib/x.ts", "/app/src").as_deref(), Some("../lib/x.ts"));
        assert_eq!(rel("/app/x.ts", "/app/src/widgets/icons").as_deref(), Some("../../../x.ts"));
        assert_eq!(rel("/app", "/app/src/widgets").as_deref(), Some("../.."));
    }

    #[test]
    fn test_identical_paths() {
        assert_eq!(rel("/app/src", "/app/src").as_deref(), Some("."));
    }

    #[test]
    fn test_unrelated_relative_paths() {
        assert_eq!(rel("src/a.ts", "lib"), None);
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("src/app/index.ts")), "src/app/index.ts");
    }
}
