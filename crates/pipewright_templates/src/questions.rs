//! Questionnaire (interactive flow) definitions.
//!
//! Each pipeline template declares its own questionnaire in a
//! `questions.json` file at the template root. The answers become the
//! variable bindings used to render the template.
//!
//! ```json
//! {
//!   "questions": [
//!     { "key": "intro", "kind": "info", "question": "{{environment_names_message}}" },
//!     { "key": "stage_name", "question": "Name of the deployment stage", "isRequired": true },
//!     { "key": "ci_system", "kind": "choice", "question": "CI system",
//!       "options": ["jenkins", "gitlab"], "nextQuestion": { "gitlab": "gitlab_url" } }
//!   ]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::flow::InteractiveFlow;

/// File name of a template's questionnaire definition.
pub const QUESTIONS_FILENAME: &str = "questions.json";

/// How a question is presented and answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Prints its text and records no answer.
    Info,
    /// Free-text input.
    #[default]
    Question,
    /// Single choice from a fixed option list.
    Choice,
    /// Yes/no question; records `"true"` or `"false"`.
    Confirm,
}

/// One question of a flow definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSpec {
    /// Context key the answer is recorded under.
    pub key: String,
    /// Prompt text; may interpolate `{{key}}` values from the context.
    pub question: String,
    #[serde(default)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    /// Default answer; may interpolate `{{key}}` values from the context.
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    /// Per-answer jump target, looked up before `default_next_question`.
    #[serde(default)]
    pub next_question: HashMap<String, String>,
    /// Jump target when no per-answer entry matches; declaration order
    /// otherwise.
    #[serde(default)]
    pub default_next_question: Option<String>,
}

/// A parsed `questions.json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowDefinition {
    pub questions: Vec<QuestionSpec>,
}

/// Loads flow definitions from disk.
pub struct FlowCreator;

impl FlowCreator {
    /// Load a template's flow definition and build the executable flow.
    pub fn create_flow(questions_path: &Path) -> TemplateResult<InteractiveFlow> {
        if !questions_path.exists() {
            return Err(TemplateError::QuestionsNotFound(
                questions_path.to_path_buf(),
            ));
        }
        debug!("Loading questions definition from {:?}", questions_path);
        let raw = fs::read_to_string(questions_path)?;
        let definition: FlowDefinition = serde_json::from_str(&raw)
            .map_err(|e| TemplateError::QuestionsMalformed(e.to_string()))?;
        Self::validate(&definition)?;
        Ok(InteractiveFlow::new(definition))
    }

    fn validate(definition: &FlowDefinition) -> TemplateResult<()> {
        let mut keys = HashSet::new();
        for question in &definition.questions {
            if !keys.insert(question.key.as_str()) {
                return Err(TemplateError::QuestionsMalformed(format!(
                    "duplicate question key '{}'",
                    question.key
                )));
            }
            if question.kind == QuestionKind::Choice && question.options.is_empty() {
                return Err(TemplateError::QuestionsMalformed(format!(
                    "choice question '{}' has no options",
                    question.key
                )));
            }
        }
        for question in &definition.questions {
            let targets = question
                .next_question
                .values()
                .chain(question.default_next_question.iter());
            for target in targets {
                if !keys.contains(target.as_str()) {
                    return Err(TemplateError::QuestionsMalformed(format!(
                        "question '{}' jumps to unknown key '{}'",
                        question.key, target
                    )));
                }
            }
        }
        Ok(())
    }
}
