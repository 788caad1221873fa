//! Pipeline template rendering.
//!
//! A pipeline template is a directory holding a `questions.json`
//! questionnaire next to a single templated payload directory (its name
//! contains `{{...}}`, conventionally `{{outputDir}}`). Rendering
//! substitutes `{{variable}}` bindings in file contents and path
//! components and writes the payload into the output directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};
use crate::flow::GenerationContext;

/// Renderer for pipeline template directories.
pub struct TemplateRenderer {
    variable_pattern: Regex,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self {
            // Match {{variable}}; dots allowed because bootstrap
            // parameters are keyed <environment>.<name>
            variable_pattern: Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_.]*)\}\}").unwrap(),
        }
    }

    /// Render the template payload into `output_dir`.
    pub fn render_dir(
        &self,
        template_dir: &Path,
        output_dir: &Path,
        context: &GenerationContext,
    ) -> TemplateResult<()> {
        let payload = self.payload_dir(template_dir)?;
        let payload_name = payload
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let target_root = join_rendered(output_dir, Path::new(&self.render_content(&payload_name, context)));
        fs::create_dir_all(&target_root)?;

        for entry in WalkDir::new(&payload)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let source = entry.path();
            let relative = source.strip_prefix(&payload).unwrap();
            let rendered_relative = self.render_path(relative, context);
            let target = join_rendered(&target_root, &rendered_relative);

            if source.is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                if self.is_text_file(source) {
                    let content = fs::read_to_string(source)?;
                    fs::write(&target, self.render_content(&content, context))?;
                    debug!("Rendered: {:?}", rendered_relative);
                } else {
                    fs::copy(source, &target)?;
                    debug!("Copied: {:?}", rendered_relative);
                }
            }
        }

        Ok(())
    }

    /// Render content by replacing variables. Unknown variables are left
    /// verbatim.
    pub fn render_content(&self, content: &str, variables: &GenerationContext) -> String {
        self.variable_pattern
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                variables
                    .get(var_name)
                    .cloned()
                    .unwrap_or_else(|| format!("{{{{{}}}}}", var_name))
            })
            .to_string()
    }

    fn render_path(&self, path: &Path, variables: &GenerationContext) -> PathBuf {
        let path_str = path.to_string_lossy();
        PathBuf::from(self.render_content(&path_str, variables))
    }

    /// The single templated top-level directory holding the payload.
    fn payload_dir(&self, template_dir: &Path) -> TemplateResult<PathBuf> {
        for entry in fs::read_dir(template_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.path().is_dir() && name.contains("{{") {
                return Ok(entry.path());
            }
        }
        Err(TemplateError::RenderingFailed(format!(
            "no templated payload directory found in {}",
            template_dir.display()
        )))
    }

    /// Check if a file is likely a text file.
    fn is_text_file(&self, path: &Path) -> bool {
        let text_extensions = [
            "txt", "md", "yaml", "yml", "json", "toml", "xml", "html", "css", "js", "ts", "py",
            "rs", "java", "groovy", "go", "rb", "sh", "bash", "ps1", "bat", "cmd", "tf", "hcl",
            "cfg", "conf", "ini", "env", "gitignore", "dockerignore", "editorconfig", "properties",
        ];

        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            return text_extensions.contains(&ext_lower.as_str());
        }

        if let Some(name) = path.file_name() {
            let name_lower = name.to_string_lossy().to_lowercase();
            return ["jenkinsfile", "dockerfile", "makefile"].contains(&name_lower.as_str());
        }

        false
    }
}

/// Join a rendered relative path onto `root`, collapsing `.` components
/// (the `outputDir = "."` override renders the payload directly into the
/// output root).
fn join_rendered(root: &Path, rendered: &Path) -> PathBuf {
    let mut target = root.to_path_buf();
    for component in rendered.components() {
        match component {
            Component::CurDir => {}
            other => target.push(other.as_os_str()),
        }
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn context(pairs: &[(&str, &str)]) -> GenerationContext {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_content() {
        let renderer = TemplateRenderer::new();
        let vars = context(&[("stage_name", "dev"), ("dev.region", "eu-west-1")]);

        let rendered =
            renderer.render_content("stage {{stage_name}} in {{dev.region}}", &vars);
        assert_eq!(rendered, "stage dev in eu-west-1");
    }

    #[test]
    fn test_unknown_variables_left_verbatim() {
        let renderer = TemplateRenderer::new();
        let rendered = renderer.render_content("keep {{unknown}}", &context(&[]));
        assert_eq!(rendered, "keep {{unknown}}");
    }

    #[test]
    fn test_render_dir_into_output_root() {
        let template = tempdir().unwrap();
        let payload = template.path().join("{{outputDir}}");
        fs::create_dir_all(payload.join("config")).unwrap();
        fs::write(template.path().join("questions.json"), "{\"questions\":[]}").unwrap();
        fs::write(payload.join("Jenkinsfile"), "branch: {{branch}}").unwrap();
        fs::write(payload.join("config").join("stages.yaml"), "stage: {{stage_name}}").unwrap();

        let output = tempdir().unwrap();
        let vars = context(&[("outputDir", "."), ("branch", "main"), ("stage_name", "dev")]);
        TemplateRenderer::new()
            .render_dir(template.path(), output.path(), &vars)
            .unwrap();

        let jenkinsfile = fs::read_to_string(output.path().join("Jenkinsfile")).unwrap();
        assert_eq!(jenkinsfile, "branch: main");
        let stages = fs::read_to_string(output.path().join("config/stages.yaml")).unwrap();
        assert_eq!(stages, "stage: dev");
        // the questionnaire definition is not part of the payload
        assert!(!output.path().join("questions.json").exists());
    }

    #[test]
    fn test_render_dir_renders_path_components() {
        let template = tempdir().unwrap();
        let payload = template.path().join("{{outputDir}}");
        fs::create_dir_all(&payload).unwrap();
        fs::write(payload.join("{{stage_name}}.yaml"), "x").unwrap();

        let output = tempdir().unwrap();
        let vars = context(&[("outputDir", "."), ("stage_name", "dev")]);
        TemplateRenderer::new()
            .render_dir(template.path(), output.path(), &vars)
            .unwrap();

        assert!(output.path().join("dev.yaml").exists());
    }

    #[test]
    fn test_missing_payload_dir() {
        let template = tempdir().unwrap();
        fs::write(template.path().join("questions.json"), "{\"questions\":[]}").unwrap();

        let output = tempdir().unwrap();
        let result =
            TemplateRenderer::new().render_dir(template.path(), output.path(), &context(&[]));
        assert!(matches!(result, Err(TemplateError::RenderingFailed(_))));
    }
}
