//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod bootstrap;
pub mod init;

/// Pipewright - CI/CD pipeline configuration generator
#[derive(Parser)]
#[command(name = "pipewright")]
#[command(version, about = "Pipewright - generate CI/CD pipeline configurations for serverless applications")]
#[command(long_about = r#"
Pipewright generates the pipeline configuration files that connect your
serverless application to your CI/CD system.

WORKFLOWS:
  init       → Interactive wizard that generates a pipeline config file
  bootstrap  → Set up the deployment resources for one pipeline stage

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Template clone failure
  4 - Manifest or questionnaire failure
  5 - Generated file conflict
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a pipeline configuration file interactively
    Init(init::InitArgs),

    /// Bootstrap deployment resources for a pipeline stage
    Bootstrap(bootstrap::BootstrapArgs),
}
