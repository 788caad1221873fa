//! Error types for pipeline templates.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template operations.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Catalogue manifest not found at {0}")]
    ManifestNotFound(PathBuf),

    #[error("Invalid catalogue manifest: {0}")]
    ManifestMalformed(String),

    #[error("Questions definition not found at {0}")]
    QuestionsNotFound(PathBuf),

    #[error("Invalid questions definition: {0}")]
    QuestionsMalformed(String),

    #[error("Template rendering failed: {0}")]
    RenderingFailed(String),

    #[error("File(s) already exist in the target directory: {}", format_paths(.0))]
    FilesAlreadyExist(Vec<PathBuf>),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
