//! Manifest file parsing for dependency extraction.
//!
//! Each repository owns at most one manifest. `requirements.txt` wins over
//! `package.json`; a `package.json` with a sibling `package-lock.json` is read
//! through the lockfile so transitive dependencies are included.

mod discover;
mod error;
mod npm;
mod python;

pub use discover::discover_repositories;
pub use error::ManifestError;
pub use npm::{parse_package_json, parse_package_lock};
pub use python::parse_requirements;

use std::path::{Path, PathBuf};

use serde::Serialize;

pub const REQUIREMENTS_FILE: &str = "requirements.txt";
pub const PACKAGE_JSON_FILE: &str = "package.json";
pub const PACKAGE_LOCK_FILE: &str = "package-lock.json";

/// Package ecosystem a dependency was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Pip,
    Npm,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Pip => "pip",
            DependencyType::Npm => "npm",
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dependency extracted from a manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub kind: DependencyType,
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn pip(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind: DependencyType::Pip,
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn npm(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind: DependencyType::Npm,
            name: name.into(),
            version: version.into(),
        }
    }
}

/// The kind of file a parser reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    RequirementsText,
    PackageJson,
    PackageLockJson,
}

impl ManifestKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::RequirementsText => REQUIREMENTS_FILE,
            ManifestKind::PackageJson => PACKAGE_JSON_FILE,
            ManifestKind::PackageLockJson => PACKAGE_LOCK_FILE,
        }
    }

    pub fn dependency_type(&self) -> DependencyType {
        match self {
            ManifestKind::RequirementsText => DependencyType::Pip,
            ManifestKind::PackageJson | ManifestKind::PackageLockJson => DependencyType::Npm,
        }
    }
}

/// The manifest associated with a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub kind: ManifestKind,
    pub path: PathBuf,
}

impl Manifest {
    /// The file the parser will actually read.
    ///
    /// For `package.json` this is the sibling `package-lock.json` when one
    /// exists, since the lockfile also carries transitive dependencies.
    pub fn source(&self) -> Manifest {
        if self.kind == ManifestKind::PackageJson {
            let lock_path = self
                .path
                .parent()
                .map(|dir| dir.join(PACKAGE_LOCK_FILE))
                .filter(|p| p.exists());

            if let Some(path) = lock_path {
                return Manifest {
                    kind: ManifestKind::PackageLockJson,
                    path,
                };
            }
        }

        self.clone()
    }
}

/// Find the single manifest of a repository, if any.
pub fn locate_manifest(repo: &Path) -> Option<Manifest> {
    [ManifestKind::RequirementsText, ManifestKind::PackageJson]
        .into_iter()
        .map(|kind| Manifest {
            kind,
            path: repo.join(kind.file_name()),
        })
        .find(|m| m.path.exists())
}

/// Parse a located manifest, reading the lockfile instead of `package.json`
/// when one sits next to it.
pub fn parse_manifest(manifest: &Manifest) -> Result<Vec<Dependency>, ManifestError> {
    let source = manifest.source();
    match source.kind {
        ManifestKind::RequirementsText => parse_requirements(&source.path),
        ManifestKind::PackageJson => parse_package_json(&source.path),
        ManifestKind::PackageLockJson => parse_package_lock(&source.path),
    }
}
