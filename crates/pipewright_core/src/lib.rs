//! # pipewright_core
//!
//! Core collaborators for the Pipewright CLI: git clone operations, the
//! persisted pipeline configuration store, bootstrap-resource discovery
//! and template acquisition into the shared cache directory.

pub mod acquire;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod git;

pub use acquire::{
    AcquiredCatalogue, TemplateAcquirer, APP_PIPELINE_TEMPLATES_CLONE_NAME,
    APP_PIPELINE_TEMPLATES_REPO_URL, CUSTOM_PIPELINE_TEMPLATE_CLONE_NAME,
};
pub use bootstrap::{
    load_pipeline_bootstrap_resources, BootstrapResources, ContextKey, BOOTSTRAP_COMMAND,
    ENVIRONMENT_NAMES_MESSAGE_KEY, PARAMETERS_SECTION,
};
pub use config::{
    PipelineConfig, DEFAULT_ENV, PIPELINE_CONFIG_DIR, PIPELINE_CONFIG_FILENAME,
};
pub use error::{CoreError, CoreResult};
pub use git::GitRepo;
