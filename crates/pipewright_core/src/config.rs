//! Persisted pipeline configuration store.
//!
//! `pipewright bootstrap` records per-stage deployment resources in a TOML
//! document under the working directory; the init wizard reads them back
//! when seeding the questionnaire. Layout:
//!
//! ```toml
//! version = 1
//!
//! [dev.pipeline_bootstrap.parameters]
//! region = "eu-west-1"
//! deployer_id = "dev-deployer"
//! ```
//!
//! Top-level tables are environments; the reserved `default` environment
//! holds values shared across stages.

use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// Directory (relative to the working directory) holding the config file.
pub const PIPELINE_CONFIG_DIR: &str = ".pipewright/pipeline";
/// File name of the pipeline configuration document.
pub const PIPELINE_CONFIG_FILENAME: &str = "pipelineconfig.toml";
/// Reserved environment name used to store shared values.
pub const DEFAULT_ENV: &str = "default";

const VERSION_KEY: &str = "version";
const CONFIG_VERSION: i64 = 1;

/// Handle over the pipeline configuration document.
///
/// The document is read once at construction; `save` writes it back.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    path: PathBuf,
    document: Table,
}

impl PipelineConfig {
    /// Open the configuration at `config_dir/filename`. A missing file is
    /// not an error; the store simply reports `exists() == false`.
    pub fn new(config_dir: &Path, filename: &str) -> CoreResult<Self> {
        let path = config_dir.join(filename);
        let document = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            raw.parse::<Table>()?
        } else {
            Table::new()
        };
        Ok(Self { path, document })
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Environment names in stored order. Includes the reserved `default`
    /// environment; callers decide whether to filter it. Non-table keys
    /// (such as `version`) are skipped.
    pub fn environment_names(&self) -> Vec<String> {
        self.document
            .iter()
            .filter(|(_, value)| value.is_table())
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// All key/value pairs of `[env.<command>.<section>]`, in stored
    /// order. Absent tables yield an empty map.
    pub fn get_all(&self, command: &[&str], section: &str, env: &str) -> Table {
        self.document
            .get(env)
            .and_then(|v| v.get(command_key(command).as_str()))
            .and_then(|v| v.get(section))
            .and_then(|v| v.as_table())
            .cloned()
            .unwrap_or_default()
    }

    /// Set one value under `[env.<command>.<section>]`, creating the
    /// intermediate tables as needed.
    pub fn put(
        &mut self,
        command: &[&str],
        section: &str,
        key: &str,
        value: impl Into<Value>,
        env: &str,
    ) {
        let command = command_key(command);
        let section_table = subtable(subtable(subtable(&mut self.document, env), &command), section);
        section_table.insert(key.to_string(), value.into());
    }

    /// Write the document back to disk, creating parent directories.
    pub fn save(&mut self) -> CoreResult<()> {
        if !self.document.contains_key(VERSION_KEY) {
            // version must precede the environment tables in the document
            let mut document = Table::new();
            document.insert(VERSION_KEY.to_string(), Value::Integer(CONFIG_VERSION));
            for (key, value) in &self.document {
                document.insert(key.clone(), value.clone());
            }
            self.document = document;
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(&self.document)?;
        debug!("Writing pipeline config to {:?}", self.path);
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

fn command_key(command: &[&str]) -> String {
    command.join("_")
}

/// Nested table under `key`, created (or replacing a non-table value) as
/// needed.
fn subtable<'a>(table: &'a mut Table, key: &str) -> &'a mut Table {
    let entry = table
        .entry(key.to_string())
        .or_insert_with(|| Value::Table(Table::new()));
    if !entry.is_table() {
        *entry = Value::Table(Table::new());
    }
    entry.as_table_mut().unwrap()
}

/// Render a TOML value as the plain string handed to the questionnaire.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BOOTSTRAP: &[&str] = &["pipeline", "bootstrap"];

    #[test]
    fn test_missing_file_reports_absent() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::new(dir.path(), PIPELINE_CONFIG_FILENAME).unwrap();
        assert!(!config.exists());
        assert!(config.environment_names().is_empty());
        assert!(config.get_all(BOOTSTRAP, "parameters", "dev").is_empty());
    }

    #[test]
    fn test_put_save_roundtrip() {
        let dir = tempdir().unwrap();
        let mut config = PipelineConfig::new(dir.path(), PIPELINE_CONFIG_FILENAME).unwrap();
        config.put(BOOTSTRAP, "parameters", "region", "eu-west-1", "dev");
        config.put(BOOTSTRAP, "parameters", "deployer_id", "dev-deployer", "dev");
        config.save().unwrap();

        let reloaded = PipelineConfig::new(dir.path(), PIPELINE_CONFIG_FILENAME).unwrap();
        assert!(reloaded.exists());
        let params = reloaded.get_all(BOOTSTRAP, "parameters", "dev");
        assert_eq!(params.get("region").unwrap().as_str(), Some("eu-west-1"));
        assert_eq!(
            params.get("deployer_id").unwrap().as_str(),
            Some("dev-deployer")
        );
    }

    #[test]
    fn test_environment_names_skip_non_tables_and_keep_order() {
        let dir = tempdir().unwrap();
        let mut config = PipelineConfig::new(dir.path(), PIPELINE_CONFIG_FILENAME).unwrap();
        config.put(BOOTSTRAP, "parameters", "region", "eu-west-1", "dev");
        config.put(BOOTSTRAP, "parameters", "region", "us-east-1", "prod");
        config.put(BOOTSTRAP, "parameters", "region", "eu-west-1", "default");
        config.save().unwrap();

        let reloaded = PipelineConfig::new(dir.path(), PIPELINE_CONFIG_FILENAME).unwrap();
        // `version` is a top-level key but not an environment
        assert_eq!(reloaded.environment_names(), vec!["dev", "prod", "default"]);
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&Value::String("abc".into())), "abc");
        assert_eq!(value_to_string(&Value::Integer(3)), "3");
    }
}
