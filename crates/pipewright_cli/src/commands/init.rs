//! Init command - interactive pipeline configuration wizard.
//!
//! Walks the user from template selection to generated files: pick a
//! template source, acquire it, choose a provider and template from the
//! catalogue manifest, check for bootstrapped stages (optionally setting
//! them up on the spot), run the template's questionnaire and materialize
//! the rendered files into the working directory.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use console::style;
use tracing::debug;

use pipewright_core::{
    load_pipeline_bootstrap_resources, BootstrapResources, PipelineConfig, TemplateAcquirer,
    APP_PIPELINE_TEMPLATES_REPO_URL, CUSTOM_PIPELINE_TEMPLATE_CLONE_NAME, PIPELINE_CONFIG_DIR,
    PIPELINE_CONFIG_FILENAME,
};
use pipewright_templates::template::{OUTPUT_DIR_CURRENT, OUTPUT_DIR_KEY};
use pipewright_templates::{
    copy_dir_contents, CatalogueManifest, ConsolePrompter, PipelineTemplate, Prompter, Provider,
    TemplateMetadata,
};

use super::bootstrap::{self, BootstrapArgs};
use crate::diagram::draw_stage_diagram;

const QUICK_START_TEMPLATE_SOURCE: &str = "Pipewright Quick Start Pipeline Templates";
const CUSTOM_TEMPLATE_SOURCE: &str = "Custom Pipeline Template Location";

// TODO: read the required stage count from the template's metadata
const REQUIRED_STAGE_COUNT: usize = 2;

const INTRO_TEXT: &str = "\
pipewright init generates a pipeline configuration file that connects your
application to your CI/CD system. We will guide you through the process to
bootstrap resources for each stage, then walk through the details necessary
for creating the pipeline configuration file.

Please ensure you are in the root folder of your application before you begin.
";

const STAGE_SETUP_TEXT: &str = "\
For each stage we will ask for [1] the stage definition, [2] the deployment
region and [3] references to the resources used to deploy your application.
You can accept the suggested defaults or point at resources you already manage.

We recommend using a separate credential profile for each stage in your pipeline.
";

#[derive(Args)]
pub struct InitArgs {
    /// Offer to bootstrap missing stages from within the wizard
    #[arg(long)]
    bootstrap: bool,
}

pub async fn execute(args: InitArgs) -> Result<()> {
    let wizard = InteractiveInitFlow::new(
        args.bootstrap,
        shared_cache_dir(),
        Path::new(PIPELINE_CONFIG_DIR).to_path_buf(),
    );
    wizard.run(&ConsolePrompter::new()).await
}

/// Shared cache location for catalogue clones, reused across invocations.
fn shared_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pipewright")
        .join("pipeline-templates")
}

/// The interactive init wizard.
pub struct InteractiveInitFlow {
    allow_bootstrap: bool,
    acquirer: TemplateAcquirer,
    config_dir: PathBuf,
}

impl InteractiveInitFlow {
    pub fn new(allow_bootstrap: bool, cache_root: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            allow_bootstrap,
            acquirer: TemplateAcquirer::new(cache_root),
            config_dir,
        }
    }

    pub async fn run(&self, prompter: &dyn Prompter) -> Result<()> {
        println!("{INTRO_TEXT}");
        println!("Select a pipeline structure template to get started:");
        let source = prompter.choice(
            "Select template",
            &[
                QUICK_START_TEMPLATE_SOURCE.to_string(),
                CUSTOM_TEMPLATE_SOURCE.to_string(),
            ],
        )?;

        let generated_files = if source == CUSTOM_TEMPLATE_SOURCE {
            self.generate_from_custom_location(prompter).await?
        } else {
            self.generate_from_quick_start_templates(prompter).await?
        };

        println!(
            "{}",
            style("Successfully created the pipeline configuration file(s):").green()
        );
        for file in &generated_files {
            println!("{}", style(format!("\t- {}", file.display())).green());
        }
        Ok(())
    }

    /// Curated-catalogue path: clone the catalogue (falling back to a
    /// cached copy when the clone fails), read its manifest and narrow it
    /// down to one template.
    async fn generate_from_quick_start_templates(
        &self,
        prompter: &dyn Prompter,
    ) -> Result<Vec<PathBuf>> {
        let catalogue = self
            .acquirer
            .acquire_catalogue(APP_PIPELINE_TEMPLATES_REPO_URL)
            .context("Failed to download the pipeline template catalogue")?;
        if !catalogue.refreshed {
            println!(
                "{}",
                style("Unable to download updated pipeline templates, using the cached copy")
                    .yellow()
            );
        }

        let manifest = CatalogueManifest::load(&catalogue.path)?;
        let metadata = select_pipeline_template(prompter, &manifest)?;
        let template_dir = catalogue.path.join(&metadata.location);
        self.generate_from_pipeline_template(prompter, &template_dir)
            .await
    }

    /// Custom path: an existing local directory is used in place;
    /// anything else is treated as a git location and cloned into a
    /// scratch directory whose cleanup failures are ignored.
    async fn generate_from_custom_location(&self, prompter: &dyn Prompter) -> Result<Vec<PathBuf>> {
        let location = prompter.input("Template Git location", None, true)?;
        if Path::new(&location).exists() {
            return self
                .generate_from_pipeline_template(prompter, Path::new(&location))
                .await;
        }

        let scratch = tempfile::tempdir().context("Failed to create a scratch directory")?;
        let clone = TemplateAcquirer::new(scratch.path())
            .acquire(&location, CUSTOM_PIPELINE_TEMPLATE_CLONE_NAME)
            .context("Failed to clone the custom pipeline template")?;
        self.generate_from_pipeline_template(prompter, &clone).await
        // scratch drops here; cleanup errors are ignored
    }

    /// Generate the pipeline config file from a local template directory.
    async fn generate_from_pipeline_template(
        &self,
        prompter: &dyn Prompter,
        template_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let template = PipelineTemplate::init(template_dir)
            .context("Failed to initialize the pipeline template")?;

        println!("You are using the {REQUIRED_STAGE_COUNT}-stage pipeline template.");
        draw_stage_diagram(REQUIRED_STAGE_COUNT);

        let resources = loop {
            println!("Checking for bootstrapped resources...");
            let config = PipelineConfig::new(&self.config_dir, PIPELINE_CONFIG_FILENAME)?;
            let resources = load_pipeline_bootstrap_resources(&config);
            if resources.environment_names.len() < REQUIRED_STAGE_COUNT
                && self
                    .prompt_run_bootstrap(prompter, &resources, REQUIRED_STAGE_COUNT)
                    .await?
            {
                // the user just went through stage setup; re-check whether
                // enough stages exist now
                continue;
            }
            break resources;
        };

        let mut context = template.run_interactive_flow(prompter, resources.into_flow_context())?;
        // keep the rendered files at the scratch root instead of a nested
        // output folder
        context.insert(OUTPUT_DIR_KEY.to_string(), OUTPUT_DIR_CURRENT.to_string());

        let scratch = tempfile::tempdir().context("Failed to create a scratch directory")?;
        debug!("Generating pipeline files into {:?}", scratch.path());
        template.generate(&context, scratch.path())?;

        let cwd = env::current_dir()?;
        let generated_files = copy_dir_contents(scratch.path(), &cwd)?;
        scratch
            .close()
            .context("Failed to clean up the scratch directory")?;
        Ok(generated_files)
    }

    /// Report the stage shortfall and, when `--bootstrap` was given, offer
    /// to run stage setup right away. Returns true when setup ran.
    async fn prompt_run_bootstrap(
        &self,
        prompter: &dyn Prompter,
        resources: &BootstrapResources,
        required: usize,
    ) -> Result<bool> {
        let detected = resources.environment_names.len();
        if detected == 0 {
            println!(
                "{}",
                style("No bootstrapped resources were detected.").yellow()
            );
        } else {
            println!(
                "{}",
                style(format!(
                    "Only {detected} bootstrapped stage(s) were detected, \
                     fewer than what the template requires: {required}."
                ))
                .yellow()
            );
        }
        println!();

        if !self.allow_bootstrap {
            println!(
                "{}",
                style(format!(
                    "To set up stages before proceeding, quit with Ctrl+C and either run\n\
                     {} to set up a stage, or re-run this command with {}\n\
                     to enable stage setup from within the wizard.",
                    style("pipewright bootstrap").bold(),
                    style("--bootstrap").bold()
                ))
                .yellow()
            );
            return Ok(false);
        }

        let go = prompter.confirm(
            "Do you want to go through stage setup now? If you choose no, \
             you can still reference resources bootstrapped elsewhere.",
            false,
        )?;
        if !go {
            return Ok(false);
        }

        println!("{STAGE_SETUP_TEXT}");
        println!("{}", style(format!("Stage {} Setup", detected + 1)).bold());
        println!();
        bootstrap::do_bootstrap(prompter, BootstrapArgs::default(), &self.config_dir).await?;
        Ok(true)
    }
}

/// Narrow the catalogue down to one template: provider first, then the
/// provider's templates. Either step is skipped when only one candidate
/// exists.
fn select_pipeline_template<'a>(
    prompter: &dyn Prompter,
    manifest: &'a CatalogueManifest,
) -> Result<&'a TemplateMetadata> {
    let provider = select_provider(prompter, &manifest.providers)?;
    let candidates = manifest.templates_for_provider(&provider.id);
    select_provider_template(prompter, candidates)
}

fn select_provider<'a>(prompter: &dyn Prompter, providers: &'a [Provider]) -> Result<&'a Provider> {
    if providers.len() == 1 {
        return Ok(&providers[0]);
    }
    let options: Vec<String> = providers.iter().map(|p| p.display_name.clone()).collect();
    let chosen = prompter.choice("CI/CD system", &options)?;
    providers
        .iter()
        .find(|p| p.display_name == chosen)
        .ok_or_else(|| anyhow!("No CI/CD system named '{chosen}'"))
}

fn select_provider_template<'a>(
    prompter: &dyn Prompter,
    templates: Vec<&'a TemplateMetadata>,
) -> Result<&'a TemplateMetadata> {
    if templates.is_empty() {
        bail!("The catalogue has no templates for the selected CI/CD system");
    }
    if templates.len() == 1 {
        return Ok(templates[0]);
    }
    let options: Vec<String> = templates.iter().map(|t| t.display_name.clone()).collect();
    let chosen = prompter.choice("Which pipeline template would you like to use?", &options)?;
    templates
        .into_iter()
        .find(|t| t.display_name == chosen)
        .ok_or_else(|| anyhow!("No pipeline template named '{chosen}'"))
}
