//! # pipewright_templates
//!
//! Pipeline template handling for Pipewright: catalogue manifest parsing,
//! questionnaire (interactive flow) definitions and execution, template
//! rendering and conflict-safe materialization of the rendered files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pipewright_templates::{ConsolePrompter, GenerationContext, PipelineTemplate};
//! use pipewright_templates::template::{OUTPUT_DIR_CURRENT, OUTPUT_DIR_KEY};
//!
//! let template = PipelineTemplate::init(Path::new("./two-stage-template")).unwrap();
//! let mut context = template
//!     .run_interactive_flow(&ConsolePrompter::new(), GenerationContext::new())
//!     .unwrap();
//! context.insert(OUTPUT_DIR_KEY.to_string(), OUTPUT_DIR_CURRENT.to_string());
//! template.generate(&context, Path::new("./out")).unwrap();
//! ```

pub mod error;
pub mod flow;
pub mod generator;
pub mod manifest;
pub mod prompt;
pub mod questions;
pub mod renderer;
pub mod template;

pub use error::{TemplateError, TemplateResult};
pub use flow::{GenerationContext, InteractiveFlow};
pub use generator::copy_dir_contents;
pub use manifest::{CatalogueManifest, Provider, TemplateMetadata, MANIFEST_FILENAME};
pub use prompt::{ConsolePrompter, Prompter};
pub use questions::{FlowCreator, FlowDefinition, QuestionKind, QuestionSpec, QUESTIONS_FILENAME};
pub use renderer::TemplateRenderer;
pub use template::PipelineTemplate;
