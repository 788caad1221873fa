//! Git clone operations for pipeline template repositories.
//!
//! Cloning shells out to the system `git` binary. A clone lands in a
//! staging directory first and is renamed into place, so an interrupted
//! or failed clone never leaves a half-written cache entry behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};

/// A remote (or local) git repository identified by its clone source.
#[derive(Debug, Clone)]
pub struct GitRepo {
    url: String,
}

impl GitRepo {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check if Git is available on the system.
    pub fn is_git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Clone this repository to `dest_parent/name`.
    ///
    /// With `replace_existing`, a clone already present at that location is
    /// deleted first; otherwise an existing target is an error. Every
    /// failure mode (missing git, network, repository, filesystem) is
    /// reported as [`CoreError::CloneFailed`].
    pub fn clone_to(
        &self,
        dest_parent: &Path,
        name: &str,
        replace_existing: bool,
    ) -> CoreResult<PathBuf> {
        if !Self::is_git_available() {
            return Err(CoreError::CloneFailed(
                "git executable not found on PATH".to_string(),
            ));
        }

        fs::create_dir_all(dest_parent).map_err(clone_error)?;
        let target = dest_parent.join(name);
        if target.exists() && !replace_existing {
            return Err(CoreError::CloneFailed(format!(
                "{} already exists",
                target.display()
            )));
        }

        let staging = tempfile::Builder::new()
            .prefix(".pipewright-clone-")
            .tempdir_in(dest_parent)
            .map_err(clone_error)?;
        let checkout = staging.path().join(name);

        debug!("Cloning {} into {:?}", self.url, checkout);
        let output = Command::new("git")
            .arg("clone")
            .arg(&self.url)
            .arg(&checkout)
            .output()
            .map_err(clone_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CoreError::CloneFailed(format!(
                "git clone failed: {}",
                stderr.trim()
            )));
        }

        if target.exists() {
            fs::remove_dir_all(&target).map_err(clone_error)?;
        }
        fs::rename(&checkout, &target).map_err(clone_error)?;

        info!("Cloned {} to {:?}", self.url, target);
        Ok(target)
    }
}

fn clone_error(err: std::io::Error) -> CoreError {
    CoreError::CloneFailed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_source_repo(dir: &Path) {
        let run = |args: &[&str]| {
            let status = Command::new("git")
                .args(args)
                .current_dir(dir)
                .output()
                .unwrap();
            assert!(status.status.success(), "git {:?} failed", args);
        };
        run(&["init"]);
        run(&["config", "user.email", "tests@example.com"]);
        run(&["config", "user.name", "Tests"]);
        fs::write(dir.join("Jenkinsfile"), "pipeline {}").unwrap();
        run(&["add", "."]);
        run(&["commit", "-m", "initial"]);
    }

    #[test]
    fn test_clone_local_repo() {
        if !GitRepo::is_git_available() {
            println!("Git not available, skipping test");
            return;
        }

        let source = TempDir::new().unwrap();
        init_source_repo(source.path());
        let cache = TempDir::new().unwrap();

        let repo = GitRepo::new(source.path().to_string_lossy());
        let clone = repo.clone_to(cache.path(), "templates", true).unwrap();

        assert_eq!(clone, cache.path().join("templates"));
        assert!(clone.join("Jenkinsfile").exists());
    }

    #[test]
    fn test_clone_replaces_existing() {
        if !GitRepo::is_git_available() {
            println!("Git not available, skipping test");
            return;
        }

        let source = TempDir::new().unwrap();
        init_source_repo(source.path());
        let cache = TempDir::new().unwrap();

        let stale = cache.path().join("templates");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("stale.txt"), "old").unwrap();

        let repo = GitRepo::new(source.path().to_string_lossy());
        let clone = repo.clone_to(cache.path(), "templates", true).unwrap();

        assert!(clone.join("Jenkinsfile").exists());
        assert!(!clone.join("stale.txt").exists());
    }

    #[test]
    fn test_clone_invalid_source() {
        let cache = TempDir::new().unwrap();
        let repo = GitRepo::new(cache.path().join("does-not-exist").to_string_lossy());

        let result = repo.clone_to(cache.path(), "templates", true);
        assert!(matches!(result, Err(CoreError::CloneFailed(_))));
    }
}
