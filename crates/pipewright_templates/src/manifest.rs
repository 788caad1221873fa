//! Pipeline template catalogue manifest.
//!
//! The curated catalogue describes the CI/CD systems it supports and the
//! templates it ships in a `manifest.yaml` file at the repository root:
//!
//! ```yaml
//! providers:
//!   - id: jenkins
//!     displayName: Jenkins
//! templates:
//!   - id: jenkins-two-stage
//!     displayName: Two-stage pipeline
//!     provider: jenkins
//!     location: templates/jenkins/two-stage
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};

/// File name of the catalogue manifest, at the catalogue root.
pub const MANIFEST_FILENAME: &str = "manifest.yaml";

/// A CI/CD system the catalogue ships templates for.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub display_name: String,
}

/// One pipeline template entry of the catalogue.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub id: String,
    pub display_name: String,
    /// Id of the provider this template targets.
    pub provider: String,
    /// Template directory, relative to the catalogue root.
    pub location: String,
}

/// The parsed catalogue manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueManifest {
    pub providers: Vec<Provider>,
    pub templates: Vec<TemplateMetadata>,
}

impl CatalogueManifest {
    /// Parse `manifest.yaml` at the root of an acquired catalogue.
    pub fn load(catalogue_dir: &Path) -> TemplateResult<Self> {
        let manifest_path = catalogue_dir.join(MANIFEST_FILENAME);
        if !manifest_path.exists() {
            return Err(TemplateError::ManifestNotFound(manifest_path));
        }
        debug!("Loading catalogue manifest from {:?}", manifest_path);
        let raw = fs::read_to_string(&manifest_path)?;
        Self::parse(&raw)
    }

    /// Parse and validate manifest content.
    pub fn parse(raw: &str) -> TemplateResult<Self> {
        let manifest: CatalogueManifest =
            serde_yaml::from_str(raw).map_err(|e| TemplateError::ManifestMalformed(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Every template must reference a declared provider.
    fn validate(&self) -> TemplateResult<()> {
        for template in &self.templates {
            if !self.providers.iter().any(|p| p.id == template.provider) {
                return Err(TemplateError::ManifestMalformed(format!(
                    "template '{}' references unknown provider '{}'",
                    template.id, template.provider
                )));
            }
        }
        Ok(())
    }

    /// Templates targeting one provider, in manifest order.
    pub fn templates_for_provider(&self, provider_id: &str) -> Vec<&TemplateMetadata> {
        self.templates
            .iter()
            .filter(|t| t.provider == provider_id)
            .collect()
    }
}
