//! Bootstrap-resource discovery for the init wizard.
//!
//! Before running a template's questionnaire, the wizard inspects the
//! pipeline configuration store for already-bootstrapped stages and seeds
//! the questionnaire context with their recorded parameters.

use std::collections::HashMap;

use crate::config::{value_to_string, PipelineConfig, DEFAULT_ENV};

/// Command whose persisted output holds the per-stage resources.
pub const BOOTSTRAP_COMMAND: &[&str] = &["pipeline", "bootstrap"];
/// Config section holding the recorded stage parameters.
pub const PARAMETERS_SECTION: &str = "parameters";
/// Flow-context key under which the stage summary message is seeded.
pub const ENVIRONMENT_NAMES_MESSAGE_KEY: &str = "environment_names_message";

/// Key of one seeded context value.
///
/// Structured on purpose: stage parameters are identified by the
/// (environment, parameter) pair, and the pair is only flattened to a
/// string at the questionnaire boundary, in [`ContextKey::flow_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextKey {
    /// Human-readable summary of the detected stage names.
    EnvironmentNamesMessage,
    /// One recorded parameter of one bootstrapped stage.
    Parameter { environment: String, name: String },
}

impl ContextKey {
    /// The flat key used when handing the value to the questionnaire.
    pub fn flow_key(&self) -> String {
        match self {
            ContextKey::EnvironmentNamesMessage => ENVIRONMENT_NAMES_MESSAGE_KEY.to_string(),
            ContextKey::Parameter { environment, name } => format!("{environment}.{name}"),
        }
    }
}

/// Stage resources detected in the pipeline configuration store.
#[derive(Debug, Clone, Default)]
pub struct BootstrapResources {
    /// Detected stage names in stored order, `default` excluded.
    pub environment_names: Vec<String>,
    values: HashMap<ContextKey, String>,
}

impl BootstrapResources {
    pub fn get(&self, key: &ContextKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Flatten into the initial questionnaire context.
    pub fn into_flow_context(self) -> HashMap<String, String> {
        self.values
            .into_iter()
            .map(|(key, value)| (key.flow_key(), value))
            .collect()
    }
}

/// Read the bootstrapped stages and their recorded parameters.
///
/// An absent store yields no stage names and an empty summary message; the
/// reserved `default` environment never appears in the result.
pub fn load_pipeline_bootstrap_resources(config: &PipelineConfig) -> BootstrapResources {
    let mut values = HashMap::new();

    if !config.exists() {
        values.insert(ContextKey::EnvironmentNamesMessage, String::new());
        return BootstrapResources {
            environment_names: Vec::new(),
            values,
        };
    }

    let environment_names: Vec<String> = config
        .environment_names()
        .into_iter()
        .filter(|name| name != DEFAULT_ENV)
        .collect();

    for environment in &environment_names {
        for (name, value) in config.get_all(BOOTSTRAP_COMMAND, PARAMETERS_SECTION, environment) {
            values.insert(
                ContextKey::Parameter {
                    environment: environment.clone(),
                    name,
                },
                value_to_string(&value),
            );
        }
    }

    values.insert(
        ContextKey::EnvironmentNamesMessage,
        summary_message(config, &environment_names),
    );

    BootstrapResources {
        environment_names,
        values,
    }
}

fn summary_message(config: &PipelineConfig, environment_names: &[String]) -> String {
    if environment_names.is_empty() {
        return String::new();
    }
    let mut message = format!(
        "Here are the stage names detected in {}:",
        config.path().display()
    );
    for name in environment_names {
        message.push_str(&format!("\n\t- {name}"));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PIPELINE_CONFIG_FILENAME;
    use tempfile::tempdir;

    fn seeded_config(dir: &std::path::Path) -> PipelineConfig {
        let mut config = PipelineConfig::new(dir, PIPELINE_CONFIG_FILENAME).unwrap();
        config.put(
            BOOTSTRAP_COMMAND,
            PARAMETERS_SECTION,
            "deployer_id",
            "dev-deployer",
            "dev",
        );
        config.put(
            BOOTSTRAP_COMMAND,
            PARAMETERS_SECTION,
            "deployer_id",
            "prod-deployer",
            "prod",
        );
        config.put(
            BOOTSTRAP_COMMAND,
            PARAMETERS_SECTION,
            "region",
            "eu-west-1",
            "default",
        );
        config.save().unwrap();
        PipelineConfig::new(dir, PIPELINE_CONFIG_FILENAME).unwrap()
    }

    #[test]
    fn test_absent_store() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::new(dir.path(), PIPELINE_CONFIG_FILENAME).unwrap();

        let resources = load_pipeline_bootstrap_resources(&config);
        assert!(resources.environment_names.is_empty());

        let context = resources.into_flow_context();
        assert_eq!(context.len(), 1);
        assert_eq!(context.get(ENVIRONMENT_NAMES_MESSAGE_KEY).unwrap(), "");
    }

    #[test]
    fn test_default_environment_excluded() {
        let dir = tempdir().unwrap();
        let config = seeded_config(dir.path());

        let resources = load_pipeline_bootstrap_resources(&config);
        assert_eq!(resources.environment_names, vec!["dev", "prod"]);

        let message = resources
            .get(&ContextKey::EnvironmentNamesMessage)
            .unwrap()
            .to_string();
        assert!(message.contains("\t- dev"));
        assert!(message.contains("\t- prod"));
        assert!(!message.contains("\t- default"));
    }

    #[test]
    fn test_parameters_keyed_per_environment() {
        let dir = tempdir().unwrap();
        let config = seeded_config(dir.path());

        let resources = load_pipeline_bootstrap_resources(&config);
        assert_eq!(
            resources.get(&ContextKey::Parameter {
                environment: "dev".to_string(),
                name: "deployer_id".to_string(),
            }),
            Some("dev-deployer")
        );
        assert_eq!(
            resources.get(&ContextKey::Parameter {
                environment: "prod".to_string(),
                name: "deployer_id".to_string(),
            }),
            Some("prod-deployer")
        );
    }

    #[test]
    fn test_flow_context_keys() {
        let dir = tempdir().unwrap();
        let config = seeded_config(dir.path());

        let context = load_pipeline_bootstrap_resources(&config).into_flow_context();
        assert_eq!(context.get("dev.deployer_id").unwrap(), "dev-deployer");
        assert_eq!(context.get("prod.deployer_id").unwrap(), "prod-deployer");
        assert!(context.contains_key(ENVIRONMENT_NAMES_MESSAGE_KEY));
    }
}
