//! Scan command - write an SBOM for every repository under a directory.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::config::ScanConfig;
use crate::inventory::{ScanOutcome, generate_sbom};

#[derive(Args)]
pub struct ScanCmd {
    /// Directory whose subdirectories are the repositories to scan
    pub path: PathBuf,

    /// Skip repositories with malformed manifests instead of aborting
    #[arg(long)]
    pub keep_going: bool,

    /// Seconds to wait for `git log` in each repository
    #[arg(long, value_name = "SECS", env = "REPO_SBOM_GIT_TIMEOUT")]
    pub git_timeout: Option<u64>,
}

/// How a scan ended, as reported to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Written,
    NoDependencies,
    InvalidDirectory,
}

impl ScanStatus {
    pub fn code(&self) -> u8 {
        match self {
            ScanStatus::Written => 0,
            ScanStatus::NoDependencies => 1,
            ScanStatus::InvalidDirectory => 2,
        }
    }
}

impl From<ScanStatus> for ExitCode {
    fn from(status: ScanStatus) -> Self {
        ExitCode::from(status.code())
    }
}

impl ScanCmd {
    pub async fn run(&self) -> Result<ScanStatus> {
        if !self.path.is_dir() {
            println!(
                "Error: The provided path '{}' is not a valid directory.",
                self.path.display()
            );
            return Ok(ScanStatus::InvalidDirectory);
        }

        let config = self.config()?;

        match generate_sbom(&self.path, &config).await? {
            ScanOutcome::Empty => {
                println!("The directory contained no dependencies.");
                Ok(ScanStatus::NoDependencies)
            }
            ScanOutcome::Written(summary) => {
                println!(
                    "Found {} repositories in '{}'",
                    summary.repositories,
                    self.path.display()
                );
                println!(
                    "Saved SBOM in CSV format to '{}'",
                    summary.csv_path.display()
                );
                println!(
                    "Saved SBOM in JSON format to '{}'",
                    summary.json_path.display()
                );
                Ok(ScanStatus::Written)
            }
        }
    }

    /// `.sbom.toml` from the scan root, with command-line flags on top.
    fn config(&self) -> Result<ScanConfig> {
        let mut config = ScanConfig::load(&self.path)?;
        if self.keep_going {
            config.keep_going = true;
        }
        if let Some(secs) = self.git_timeout {
            config.git_timeout_secs = secs;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cmd(path: PathBuf) -> ScanCmd {
        ScanCmd {
            path,
            keep_going: false,
            git_timeout: None,
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ScanStatus::Written.code(), 0);
        assert_eq!(ScanStatus::NoDependencies.code(), 1);
        assert_eq!(ScanStatus::InvalidDirectory.code(), 2);
    }

    #[tokio::test]
    async fn test_invalid_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "").unwrap();

        assert_eq!(
            cmd(tmp.path().join("missing")).run().await.unwrap(),
            ScanStatus::InvalidDirectory
        );
        assert_eq!(cmd(file).run().await.unwrap(), ScanStatus::InvalidDirectory);
    }

    #[tokio::test]
    async fn test_no_dependencies() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(
            cmd(tmp.path().to_path_buf()).run().await.unwrap(),
            ScanStatus::NoDependencies
        );
    }

    #[tokio::test]
    async fn test_written() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("api")).unwrap();
        fs::write(tmp.path().join("api/requirements.txt"), "flask==3.0.0\n").unwrap();

        assert_eq!(
            cmd(tmp.path().to_path_buf()).run().await.unwrap(),
            ScanStatus::Written
        );
        assert!(tmp.path().join("sbom.csv").exists());
        assert!(tmp.path().join("sbom.json").exists());
    }

    #[test]
    fn test_flags_override_config_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".sbom.toml"),
            "git_timeout_secs = 90\nexclude = [\"old\"]\n",
        )
        .unwrap();

        let mut scan = cmd(tmp.path().to_path_buf());
        scan.keep_going = true;
        scan.git_timeout = Some(5);

        let config = scan.config().unwrap();
        assert!(config.keep_going);
        assert_eq!(config.git_timeout_secs, 5);
        assert_eq!(config.exclude, vec!["old"]);
    }
}
