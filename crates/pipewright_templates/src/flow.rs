//! Interactive flow execution.
//!
//! Runs a template's questionnaire against a [`Prompter`], threading the
//! answers into the flat context used to render the template. The wizard
//! pre-seeds that context with the detected bootstrap resources, which
//! question text and defaults can interpolate via `{{key}}`.

use std::collections::HashMap;

use tracing::debug;

use crate::error::TemplateResult;
use crate::prompt::Prompter;
use crate::questions::{FlowDefinition, QuestionKind, QuestionSpec};
use crate::renderer::TemplateRenderer;

/// The variable bindings produced by a questionnaire.
pub type GenerationContext = HashMap<String, String>;

/// An executable questionnaire.
pub struct InteractiveFlow {
    definition: FlowDefinition,
    renderer: TemplateRenderer,
}

impl InteractiveFlow {
    pub(crate) fn new(definition: FlowDefinition) -> Self {
        Self {
            definition,
            renderer: TemplateRenderer::new(),
        }
    }

    pub fn questions(&self) -> &[QuestionSpec] {
        &self.definition.questions
    }

    /// Execute the flow to completion and return the resulting context.
    /// The initial context passes through untouched unless a question
    /// records an answer under the same key.
    pub fn run(
        &self,
        prompter: &dyn Prompter,
        initial_context: GenerationContext,
    ) -> TemplateResult<GenerationContext> {
        let mut context = initial_context;
        let positions: HashMap<&str, usize> = self
            .definition
            .questions
            .iter()
            .enumerate()
            .map(|(index, q)| (q.key.as_str(), index))
            .collect();

        let mut current = if self.definition.questions.is_empty() {
            None
        } else {
            Some(0)
        };
        while let Some(position) = current {
            let question = &self.definition.questions[position];
            let answer = self.ask(prompter, question, &context)?;
            debug!("Answered question '{}'", question.key);
            if let Some(answer) = &answer {
                context.insert(question.key.clone(), answer.clone());
            }
            current = self.next_position(question, answer.as_deref(), position, &positions);
        }

        Ok(context)
    }

    fn ask(
        &self,
        prompter: &dyn Prompter,
        question: &QuestionSpec,
        context: &GenerationContext,
    ) -> TemplateResult<Option<String>> {
        let text = self.renderer.render_content(&question.question, context);
        match question.kind {
            QuestionKind::Info => {
                prompter.info(&text);
                Ok(None)
            }
            QuestionKind::Question => {
                let default = question
                    .default
                    .as_ref()
                    .map(|d| self.renderer.render_content(d, context));
                prompter
                    .input(&text, default.as_deref(), question.is_required)
                    .map(Some)
            }
            QuestionKind::Choice => prompter.choice(&text, &question.options).map(Some),
            QuestionKind::Confirm => {
                let default = matches!(question.default.as_deref(), Some("true" | "yes"));
                prompter
                    .confirm(&text, default)
                    .map(|answer| Some(answer.to_string()))
            }
        }
    }

    fn next_position(
        &self,
        question: &QuestionSpec,
        answer: Option<&str>,
        position: usize,
        positions: &HashMap<&str, usize>,
    ) -> Option<usize> {
        if let Some(answer) = answer {
            if let Some(target) = question.next_question.get(answer) {
                return positions.get(target.as_str()).copied();
            }
        }
        if let Some(target) = &question.default_next_question {
            return positions.get(target.as_str()).copied();
        }
        if position + 1 < self.definition.questions.len() {
            Some(position + 1)
        } else {
            None
        }
    }
}
