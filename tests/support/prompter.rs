//! Scripted prompter for driving the console session.

use std::collections::VecDeque;

use botdeck::adapter::inbound::cli::prompt::Prompter;
use botdeck::error::{Error, Result};

/// One expected prompt and the operator's answer.
#[derive(Debug, Clone)]
pub enum Answer {
    /// Choose this index.
    Select(usize),
    /// Type this text; empty text accepts the default.
    Input(String),
    /// Acknowledge a pause.
    Pause,
}

pub fn select(index: usize) -> Answer {
    Answer::Select(index)
}

pub fn input(text: &str) -> Answer {
    Answer::Input(text.to_string())
}

/// Replays answers in order and records every prompt it was shown.
///
/// Running out of answers, or receiving a different kind of prompt than
/// scripted, fails with an I/O error so the session ends.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub prompts: Vec<String>,
    pub menus: Vec<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
            menus: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.answers.is_empty()
    }

    fn next(&mut self, prompt: &str) -> Result<Answer> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("script exhausted at prompt '{prompt}'"),
            ))
        })
    }
}

fn mismatch(prompt: &str, got: &Answer) -> Error {
    Error::Io(std::io::Error::other(format!(
        "prompt '{prompt}' got scripted answer {got:?}"
    )))
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, prompt: &str, items: &[String], _default: usize) -> Result<usize> {
        self.menus.push(items.to_vec());
        match self.next(prompt)? {
            Answer::Select(index) if index < items.len() => Ok(index),
            other => Err(mismatch(prompt, &other)),
        }
    }

    fn input(&mut self, prompt: &str, default: &str) -> Result<String> {
        match self.next(prompt)? {
            Answer::Input(text) if text.is_empty() => Ok(default.to_string()),
            Answer::Input(text) => Ok(text),
            other => Err(mismatch(prompt, &other)),
        }
    }

    fn pause(&mut self) -> Result<()> {
        match self.next("pause")? {
            Answer::Pause => Ok(()),
            other => Err(mismatch("pause", &other)),
        }
    }
}
