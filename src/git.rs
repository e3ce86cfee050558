//! Latest-commit lookup through the `git` CLI.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git exited with {status}: {stderr}")]
    Exit { status: ExitStatus, stderr: String },

    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),

    #[error("git output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("git did not finish within {0:?}")]
    Timeout(Duration),
}

/// Full hash of the most recent commit on the current ref of `repo`.
///
/// Returns `Ok(None)` when git succeeds but prints nothing. Without a
/// `timeout` the call waits for git to exit.
pub async fn head_commit(
    repo: &Path,
    timeout: Option<Duration>,
) -> Result<Option<String>, GitError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["log", "--format=%H", "-n", "1"])
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, output)
            .await
            .map_err(|_| GitError::Timeout(limit))??,
        None => output.await?,
    };

    if !output.status.success() {
        return Err(GitError::Exit {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let hash = String::from_utf8(output.stdout)?.trim().to_string();
    Ok((!hash.is_empty()).then_some(hash))
}

/// Like [`head_commit`], but failures are logged and reported as `None`.
pub async fn latest_commit(repo: &Path, timeout: Option<Duration>) -> Option<String> {
    match head_commit(repo, timeout).await {
        Ok(Some(hash)) => {
            debug!(repo = %repo.display(), commit = %hash, "resolved latest commit");
            Some(hash)
        }
        // Reported as absent (`null` in JSON) rather than an empty string.
        Ok(None) => {
            warn!(repo = %repo.display(), "git log returned no commit");
            None
        }
        Err(GitError::Exit { status, stderr }) => {
            warn!(
                repo = %repo.display(),
                %status,
                stderr = %stderr,
                "failed to retrieve git commit, the repository might not have any commits or isn't a valid git repository"
            );
            None
        }
        Err(e) => {
            warn!(repo = %repo.display(), error = %e, "error while retrieving git commit");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    const TIMEOUT: Option<Duration> = Some(Duration::from_secs(30));

    pub(crate) fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Run git in `dir` with a throwaway identity.
    pub(crate) fn git(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .arg("-C")
            .arg(dir)
            .args([
                "-c",
                "user.name=Test",
                "-c",
                "user.email=test@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    /// Initialise `dir` as a repository with one empty commit.
    pub(crate) fn init_repo(dir: &Path) {
        git(dir, &["init", "-q"]);
        git(dir, &["commit", "-q", "--allow-empty", "-m", "init"]);
    }

    #[tokio::test]
    async fn test_head_commit() {
        if !git_available() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        init_repo(tmp.path());

        let expected = std::process::Command::new("git")
            .arg("-C")
            .arg(tmp.path())
            .args(["rev-parse", "HEAD"])
            .output()
            .unwrap();
        let expected = String::from_utf8(expected.stdout).unwrap().trim().to_string();

        let hash = head_commit(tmp.path(), TIMEOUT).await.unwrap();
        assert_eq!(hash, Some(expected));
    }

    #[tokio::test]
    async fn test_head_commit_without_timeout() {
        if !git_available() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        init_repo(tmp.path());

        let hash = head_commit(tmp.path(), None).await.unwrap();
        assert!(hash.is_some_and(|h| h.chars().all(|c| c.is_ascii_hexdigit())));
    }

    #[tokio::test]
    async fn test_repository_without_commits() {
        if !git_available() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        git(tmp.path(), &["init", "-q"]);

        let err = head_commit(tmp.path(), TIMEOUT).await.unwrap_err();
        assert!(matches!(err, GitError::Exit { .. }));
        assert_eq!(latest_commit(tmp.path(), TIMEOUT).await, None);
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");

        assert_eq!(latest_commit(&missing, TIMEOUT).await, None);
    }
}
