//! A pipeline template: a templated directory plus its questionnaire.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TemplateResult;
use crate::flow::{GenerationContext, InteractiveFlow};
use crate::prompt::Prompter;
use crate::questions::{FlowCreator, QUESTIONS_FILENAME};
use crate::renderer::TemplateRenderer;

/// Context variable naming the rendered output folder.
pub const OUTPUT_DIR_KEY: &str = "outputDir";
/// Sentinel value that renders the payload directly into the output root.
pub const OUTPUT_DIR_CURRENT: &str = ".";

/// Handle over one local pipeline template directory.
pub struct PipelineTemplate {
    location: PathBuf,
    flow: InteractiveFlow,
}

impl PipelineTemplate {
    /// Initialize a template from its local directory, loading the
    /// questionnaire definition from `questions.json`.
    pub fn init(template_dir: &Path) -> TemplateResult<Self> {
        let flow = FlowCreator::create_flow(&template_dir.join(QUESTIONS_FILENAME))?;
        Ok(Self {
            location: template_dir.to_path_buf(),
            flow,
        })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Run the template's questionnaire seeded with `initial_context`.
    pub fn run_interactive_flow(
        &self,
        prompter: &dyn Prompter,
        initial_context: GenerationContext,
    ) -> TemplateResult<GenerationContext> {
        self.flow.run(prompter, initial_context)
    }

    /// Render the template into `output_dir` with the given bindings.
    pub fn generate(&self, context: &GenerationContext, output_dir: &Path) -> TemplateResult<()> {
        debug!("Generating pipeline files into {:?}", output_dir);
        TemplateRenderer::new().render_dir(&self.location, output_dir, context)
    }
}
