use anyhow::{Context, Result};
use log::debug;
use std::{fs, path::Path};

/// Replace `path` with `contents` in one step: the text is staged next to the
/// target and renamed over it, so readers never observe a partial file.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .with_context(|| format!("{} does not name a file", path.display()))?;
    let staged = path.with_file_name(format!(".{}.tstf-tmp", file_name.to_string_lossy()));

    fs::write(&staged, contents)
        .with_context(|| format!("Failed to write {}", staged.display()))?;
    if let Err(e) = fs::rename(&staged, path) {
        let _ = fs::remove_file(&staged);
        return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
    }
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("index.ts");
        fs::write(&target, "old").unwrap();

        write_atomically(&target, "new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("missing/index.ts");
        assert!(write_atomically(&target, "text").is_err());
        assert!(!target.exists());
    }
}
