//! Python manifest parsing (requirements.txt).
//!
//! Only exact pins (`name==version`) are recognised. Anything else is
//! reported and skipped.

use std::path::Path;

use tracing::warn;

use super::{Dependency, ManifestError};

pub fn parse_requirements(path: &Path) -> Result<Vec<Dependency>, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let deps = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(|line| {
            let dep = parse_pin(line);
            if dep.is_none() {
                warn!(file = %path.display(), line, "incorrect requirement format, skipping");
            }
            dep
        })
        .collect();

    Ok(deps)
}

/// Parse "package==1.2.3". The line must contain exactly one `==`.
fn parse_pin(line: &str) -> Option<Dependency> {
    let mut parts = line.split("==");
    let name = parts.next()?;
    let version = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    Some(Dependency::pip(name, version))
}
