//! Template acquisition into the shared cache directory.
//!
//! Clones land under a caller-provided cache root so the acquirer can be
//! exercised against a temporary directory in tests.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::git::GitRepo;

/// Remote repository hosting the curated pipeline template catalogue.
pub const APP_PIPELINE_TEMPLATES_REPO_URL: &str =
    "https://github.com/pipewright/pipeline-init-templates.git";
/// Folder name the catalogue is cloned under inside the cache root.
pub const APP_PIPELINE_TEMPLATES_CLONE_NAME: &str = "app-pipeline-templates";
/// Folder name custom template clones are given.
pub const CUSTOM_PIPELINE_TEMPLATE_CLONE_NAME: &str = "custom-pipeline-template";

/// Result of acquiring the curated catalogue.
#[derive(Debug)]
pub struct AcquiredCatalogue {
    pub path: PathBuf,
    /// False when the clone failed and a cached copy from a previous run
    /// is being used instead.
    pub refreshed: bool,
}

/// Clones template repositories into a fixed cache location.
#[derive(Debug)]
pub struct TemplateAcquirer {
    cache_root: PathBuf,
}

impl TemplateAcquirer {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
        }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Clone `source` to `cache_root/name`, replacing any previous clone.
    pub fn acquire(&self, source: &str, name: &str) -> CoreResult<PathBuf> {
        GitRepo::new(source).clone_to(&self.cache_root, name, true)
    }

    /// Clone the curated catalogue. When the clone fails and a previous
    /// clone exists locally, the stale copy is used instead of failing.
    pub fn acquire_catalogue(&self, url: &str) -> CoreResult<AcquiredCatalogue> {
        match self.acquire(url, APP_PIPELINE_TEMPLATES_CLONE_NAME) {
            Ok(path) => Ok(AcquiredCatalogue {
                path,
                refreshed: true,
            }),
            Err(CoreError::CloneFailed(reason)) => {
                let previous = self.cache_root.join(APP_PIPELINE_TEMPLATES_CLONE_NAME);
                if previous.exists() {
                    warn!("Unable to refresh the pipeline template catalogue: {reason}");
                    Ok(AcquiredCatalogue {
                        path: previous,
                        refreshed: false,
                    })
                } else {
                    Err(CoreError::CloneFailed(reason))
                }
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_catalogue_falls_back_to_previous_clone() {
        let cache = tempdir().unwrap();
        let previous = cache.path().join(APP_PIPELINE_TEMPLATES_CLONE_NAME);
        fs::create_dir_all(&previous).unwrap();
        fs::write(previous.join("manifest.yaml"), "providers: []\ntemplates: []\n").unwrap();

        let acquirer = TemplateAcquirer::new(cache.path());
        let bogus_url = cache.path().join("no-such-repo");
        let acquired = acquirer
            .acquire_catalogue(&bogus_url.to_string_lossy())
            .unwrap();

        assert_eq!(acquired.path, previous);
        assert!(!acquired.refreshed);
    }

    #[test]
    fn test_catalogue_fails_without_previous_clone() {
        let cache = tempdir().unwrap();
        let acquirer = TemplateAcquirer::new(cache.path());
        let bogus_url = cache.path().join("no-such-repo");

        let result = acquirer.acquire_catalogue(&bogus_url.to_string_lossy());
        assert!(matches!(result, Err(CoreError::CloneFailed(_))));
    }
}
