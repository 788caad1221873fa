//! Bootstrap command - set up the deployment resources for one stage.
//!
//! Collects the stage definition interactively (or from flags) and records
//! the resulting parameters in the pipeline configuration store, where the
//! init wizard picks them up to seed template questionnaires.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use pipewright_core::{
    PipelineConfig, BOOTSTRAP_COMMAND, PARAMETERS_SECTION, PIPELINE_CONFIG_DIR,
    PIPELINE_CONFIG_FILENAME,
};
use pipewright_templates::{ConsolePrompter, Prompter};

#[derive(Args, Default)]
pub struct BootstrapArgs {
    /// Name of the stage to set up
    #[arg(long)]
    pub environment: Option<String>,

    /// Deployment region for the stage resources
    #[arg(long)]
    pub region: Option<String>,

    /// Identifier of an existing deployer credential to reuse
    #[arg(long)]
    pub deployer_id: Option<String>,

    /// Identifier of an existing artifact store to reuse
    #[arg(long)]
    pub artifact_store_id: Option<String>,
}

pub async fn execute(args: BootstrapArgs) -> Result<()> {
    do_bootstrap(
        &ConsolePrompter::new(),
        args,
        Path::new(PIPELINE_CONFIG_DIR),
    )
    .await
}

/// Collect one stage definition and record it in the pipeline config.
/// The init wizard invokes this with every argument defaulted.
pub(crate) async fn do_bootstrap(
    prompter: &dyn Prompter,
    args: BootstrapArgs,
    config_dir: &Path,
) -> Result<()> {
    let environment = match args.environment {
        Some(name) => name,
        None => prompter.input("Stage definition: name of this stage", None, true)?,
    };
    let region = match args.region {
        Some(region) => region,
        None => prompter.input("Deployment region", None, true)?,
    };
    let deployer_default = format!("{environment}-deployer");
    let deployer_id = match args.deployer_id {
        Some(id) => id,
        None => prompter.input("Deployer credential id", Some(&deployer_default), false)?,
    };
    let artifacts_default = format!("{environment}-artifacts");
    let artifact_store_id = match args.artifact_store_id {
        Some(id) => id,
        None => prompter.input("Artifact store id", Some(&artifacts_default), false)?,
    };

    let confirmed = prompter.confirm(
        &format!("Record these resources for stage '{environment}'?"),
        true,
    )?;
    if !confirmed {
        println!("{}", style("Canceled stage setup.").yellow());
        return Ok(());
    }

    let mut config = PipelineConfig::new(config_dir, PIPELINE_CONFIG_FILENAME)
        .context("Failed to open the pipeline config")?;
    record_stage(
        &mut config,
        &environment,
        &[
            ("region", region),
            ("deployer_id", deployer_id),
            ("artifact_store_id", artifact_store_id),
        ],
    );
    config.save().context("Failed to write the pipeline config")?;

    println!(
        "{}",
        style(format!(
            "Stage '{}' resources recorded in {}",
            environment,
            config.path().display()
        ))
        .green()
    );
    Ok(())
}

fn record_stage(config: &mut PipelineConfig, environment: &str, parameters: &[(&str, String)]) {
    for (key, value) in parameters {
        config.put(
            BOOTSTRAP_COMMAND,
            PARAMETERS_SECTION,
            key,
            value.clone(),
            environment,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipewright_core::load_pipeline_bootstrap_resources;
    use tempfile::tempdir;

    #[test]
    fn test_record_stage_is_visible_to_resource_discovery() {
        let dir = tempdir().unwrap();
        let mut config = PipelineConfig::new(dir.path(), PIPELINE_CONFIG_FILENAME).unwrap();
        record_stage(
            &mut config,
            "dev",
            &[
                ("region", "eu-west-1".to_string()),
                ("deployer_id", "dev-deployer".to_string()),
            ],
        );
        config.save().unwrap();

        let reloaded = PipelineConfig::new(dir.path(), PIPELINE_CONFIG_FILENAME).unwrap();
        let resources = load_pipeline_bootstrap_resources(&reloaded);
        assert_eq!(resources.environment_names, vec!["dev"]);

        let context = resources.into_flow_context();
        assert_eq!(context.get("dev.region").unwrap(), "eu-west-1");
        assert_eq!(context.get("dev.deployer_id").unwrap(), "dev-deployer");
    }
}
