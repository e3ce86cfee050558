//! Manifest parsing errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid manifest {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("dependency tree in {path} is nested deeper than {limit} levels")]
    TooDeep { path: PathBuf, limit: usize },
}

impl ManifestError {
    pub(crate) fn invalid(path: &std::path::Path, reason: impl Into<String>) -> Self {
        ManifestError::Invalid {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
