//! Operator prompts.
//!
//! The session talks to the terminal only through [`Prompter`], so the menu
//! flow can be driven by a script in tests.

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::error::Result;

/// Blocking operator input.
pub trait Prompter {
    /// Show a list and return the chosen index.
    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize>;

    /// Read one line of text, returning `default` on empty input.
    fn input(&mut self, prompt: &str, default: &str) -> Result<String>;

    /// Wait for the operator to acknowledge output.
    fn pause(&mut self) -> Result<()>;
}

/// Prompter backed by the real terminal.
///
/// dialoguer blocks the calling thread, so calls are wrapped in
/// [`tokio::task::block_in_place`] when a multi-threaded runtime is active.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

fn blocking<T>(f: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        let theme = &self.theme;
        let choice = blocking(|| {
            Select::with_theme(theme)
                .with_prompt(prompt)
                .items(items)
                .default(default)
                .interact()
        })?;
        Ok(choice)
    }

    fn input(&mut self, prompt: &str, default: &str) -> Result<String> {
        let theme = &self.theme;
        let value = blocking(|| {
            let mut input = Input::<String>::with_theme(theme).with_prompt(prompt);
            if !default.is_empty() {
                input = input.default(default.to_string());
            }
            input.interact_text()
        })?;
        Ok(value)
    }

    fn pause(&mut self) -> Result<()> {
        let theme = &self.theme;
        blocking(|| {
            Input::<String>::with_theme(theme)
                .with_prompt("Press Enter to continue...")
                .allow_empty(true)
                .interact_text()
        })?;
        Ok(())
    }
}
