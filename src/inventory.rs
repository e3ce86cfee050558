//! SBOM assembly: per-repository extraction, provenance and aggregation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::git;
use crate::manifests::{
    Dependency, DependencyType, discover_repositories, locate_manifest, parse_manifest,
};
use crate::output::{self, CSV_FILE, JSON_FILE};

/// One line of the SBOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SbomRecord {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: DependencyType,
    pub file_path: String,
    pub git_commit: Option<String>,
}

impl SbomRecord {
    /// Attach provenance to a parsed dependency.
    pub fn new(dep: Dependency, file_path: &Path, git_commit: Option<&str>) -> Self {
        Self {
            name: dep.name,
            version: dep.version,
            kind: dep.kind,
            file_path: file_path.to_string_lossy().into_owned(),
            git_commit: git_commit.map(String::from),
        }
    }
}

/// What was written by a successful scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomSummary {
    pub repositories: usize,
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Both SBOM files were written.
    Written(SbomSummary),
    /// No repository declared any dependency; nothing was written.
    Empty,
}

/// Extract the records of a single repository.
///
/// `file_path` is the located manifest, so npm records point at
/// `package.json` even when they were read from `package-lock.json`.
pub async fn scan_repository(repo: &Path, config: &ScanConfig) -> Result<Vec<SbomRecord>> {
    let Some(manifest) = locate_manifest(repo) else {
        debug!(repo = %repo.display(), "no manifest");
        return Ok(vec![]);
    };

    let commit = git::latest_commit(repo, config.git_timeout()).await;

    let deps = match parse_manifest(&manifest) {
        Ok(deps) => deps,
        Err(e) if config.keep_going => {
            warn!(repo = %repo.display(), error = %e, "skipping repository with unreadable manifest");
            return Ok(vec![]);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to scan {}", repo.display()));
        }
    };

    debug!(
        repo = %repo.display(),
        manifest = %manifest.source().path.display(),
        ecosystem = %manifest.kind.dependency_type(),
        count = deps.len(),
        "parsed manifest"
    );

    Ok(deps
        .into_iter()
        .map(|dep| SbomRecord::new(dep, &manifest.path, commit.as_deref()))
        .collect())
}

/// Collect the records of every repository under `root`, in discovery order.
///
/// Returns the number of repositories visited alongside the records.
pub async fn collect_records(root: &Path, config: &ScanConfig) -> Result<(usize, Vec<SbomRecord>)> {
    let repos = discover_repositories(root, &config.exclude)?;

    let mut records = Vec::new();
    for repo in &repos {
        records.extend(scan_repository(repo, config).await?);
    }

    Ok((repos.len(), records))
}

/// Scan `root` and write `sbom.csv` and `sbom.json` into it.
pub async fn generate_sbom(root: &Path, config: &ScanConfig) -> Result<ScanOutcome> {
    let (repositories, records) = collect_records(root, config).await?;

    if records.is_empty() {
        return Ok(ScanOutcome::Empty);
    }

    let csv_path = root.join(CSV_FILE);
    let json_path = root.join(JSON_FILE);

    output::write_csv(&records, &csv_path)?;
    output::write_json(&records, &json_path)?;

    info!(repositories, records = records.len(), "wrote SBOM");

    Ok(ScanOutcome::Written(SbomSummary {
        repositories,
        csv_path,
        json_path,
    }))
}
