//! Repository discovery.
//!
//! Every immediate subdirectory of the scan root is one repository. Nothing
//! deeper is visited: a repository's manifest lives at its top level.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// List the repositories under `root`, skipping directories named in `exclude`.
///
/// Paths are sorted so repeated scans of the same tree emit records in the
/// same order.
pub fn discover_repositories(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    let excluded: HashSet<&str> = exclude.iter().map(|s| s.as_str()).collect();

    let entries = std::fs::read_dir(root)
        .with_context(|| format!("Failed to list {}", root.display()))?;

    let mut repos = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", root.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let name = entry.file_name();
        if excluded.contains(&*name.to_string_lossy()) {
            debug!(repo = %path.display(), "excluded by config");
            continue;
        }

        repos.push(path);
    }

    repos.sort();
    Ok(repos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_only_directories() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::create_dir_all(root.join("frontend")).unwrap();
        fs::create_dir_all(root.join("backend/nested")).unwrap();
        fs::write(root.join("notes.txt"), "not a repo").unwrap();
        fs::write(root.join("requirements.txt"), "a==1.0").unwrap();

        let repos = discover_repositories(root, &[]).unwrap();

        assert_eq!(repos, vec![root.join("backend"), root.join("frontend")]);
    }

    #[test]
    fn test_includes_hidden_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".tools")).unwrap();

        let repos = discover_repositories(tmp.path(), &[]).unwrap();
        assert_eq!(repos, vec![tmp.path().join(".tools")]);
    }

    #[test]
    fn test_exclude() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::create_dir_all(root.join("app")).unwrap();
        fs::create_dir_all(root.join("archived")).unwrap();

        let repos = discover_repositories(root, &["archived".to_string()]).unwrap();
        assert_eq!(repos, vec![root.join("app")]);
    }

    #[test]
    fn test_empty_root() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_repositories(tmp.path(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_repositories(&tmp.path().join("missing"), &[]).is_err());
    }
}
