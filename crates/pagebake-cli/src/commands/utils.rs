use std::path::{Path, PathBuf};

use crate::error::{CliError, Result, ResultExt};

/// Project root: `--cwd` resolved against the current directory, or the
/// current directory itself.
pub fn resolve_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir().context("Failed to read current directory")?;
    let root = match cwd {
        Some(dir) => current.join(dir),
        None => current,
    };
    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "'{}' is not a directory",
            root.display()
        )));
    }
    Ok(root)
}

/// Inputs from `paths` that don't exist.
pub fn missing_files(paths: &[PathBuf]) -> Vec<&Path> {
    paths
        .iter()
        .filter(|p| !p.is_file())
        .map(PathBuf::as_path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_root_absolute() {
        let temp = TempDir::new().unwrap();
        assert_eq!(resolve_root(Some(temp.path())).unwrap(), temp.path());
    }

    #[test]
    fn test_resolve_root_rejects_missing_dir() {
        let temp = TempDir::new().unwrap();
        let err = resolve_root(Some(&temp.path().join("nope"))).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_files() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("index.html");
        std::fs::write(&present, "").unwrap();
        let absent = temp.path().join("index.css");
        let paths = vec![present, absent.clone()];
        assert_eq!(missing_files(&paths), vec![absent.as_path()]);
    }
}
