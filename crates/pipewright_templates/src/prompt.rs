//! Prompt abstraction over the interactive terminal.
//!
//! Selection and questionnaire code talks to a [`Prompter`] so it can be
//! exercised in tests without a TTY; [`ConsolePrompter`] is the
//! `dialoguer`-backed implementation the CLI uses.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::error::{TemplateError, TemplateResult};

#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Single-choice menu; returns the selected option verbatim.
    fn choice(&self, text: &str, options: &[String]) -> TemplateResult<String>;

    /// Free-text input. Empty input is re-prompted when `required` and no
    /// default applies.
    fn input<'a>(&self, text: &str, default: Option<&'a str>, required: bool)
        -> TemplateResult<String>;

    /// Yes/no question.
    fn confirm(&self, text: &str, default: bool) -> TemplateResult<bool>;

    /// Present an informational message.
    fn info(&self, text: &str);
}

/// Terminal-backed prompter.
#[derive(Default)]
pub struct ConsolePrompter {
    theme: ColorfulTheme,
}

impl ConsolePrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for ConsolePrompter {
    fn choice(&self, text: &str, options: &[String]) -> TemplateResult<String> {
        let selection = Select::with_theme(&self.theme)
            .with_prompt(text)
            .items(options)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        Ok(options[selection].clone())
    }

    fn input<'a>(
        &self,
        text: &str,
        default: Option<&'a str>,
        required: bool,
    ) -> TemplateResult<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(text)
            .allow_empty(!required);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(prompt_error)
    }

    fn confirm(&self, text: &str, default: bool) -> TemplateResult<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(text)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    fn info(&self, text: &str) {
        println!("{text}");
    }
}

fn prompt_error(err: dialoguer::Error) -> TemplateError {
    TemplateError::Prompt(err.to_string())
}
