//! Interactive placeholder filling
//!
//! Asks for a value for each placeholder of a template, in reading order.
//! An empty answer keeps the placeholder as written; end-of-input stops
//! asking and keeps the answers so far; an interrupt abandons the session.

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::compiler::UserInputs;
use crate::placeholder;

/// Reply to a single question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Line(String),
    /// End of input (Ctrl-D)
    Finished,
    /// Interrupt (Ctrl-C)
    Aborted,
}

/// Source of answers for a fill session
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Result<Reply>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, prompt: &str) -> Result<Reply> {
        (**self).ask(prompt)
    }
}

/// Line-editor backed prompter for terminals
pub struct ReadlinePrompter {
    editor: DefaultEditor,
}

impl ReadlinePrompter {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self { editor })
    }
}

impl Prompter for ReadlinePrompter {
    fn ask(&mut self, prompt: &str) -> Result<Reply> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Reply::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Reply::Aborted),
            Err(ReadlineError::Eof) => Ok(Reply::Finished),
            Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
        }
    }
}

/// Collects placeholder values for one template
pub struct FillSession<P: Prompter> {
    prompter: P,
}

impl<P: Prompter> FillSession<P> {
    pub fn new(prompter: P) -> Self {
        Self { prompter }
    }

    /// Ask for every placeholder in `body`
    ///
    /// Returns `None` when the user aborts.
    pub fn collect(&mut self, body: &str) -> Result<Option<UserInputs>> {
        let names = placeholder::extract_in_order(body);
        debug!(count = names.len(), "FillSession::collect: called");

        let mut inputs = UserInputs::new();
        for name in &names {
            match self.prompter.ask(&question(name))? {
                Reply::Line(value) => {
                    let value = value.trim();
                    if !value.is_empty() {
                        inputs.insert(name.as_str(), value);
                    }
                }
                Reply::Finished => {
                    debug!("FillSession::collect: input finished early");
                    break;
                }
                Reply::Aborted => {
                    debug!("FillSession::collect: aborted");
                    return Ok(None);
                }
            }
        }
        Ok(Some(inputs))
    }
}

/// Question text for one placeholder
fn question(name: &str) -> String {
    if name.is_empty() {
        warn!("Template contains an empty placeholder");
        format!("{} {} ", "【】".yellow(), "(empty placeholder) >".dimmed())
    } else {
        format!("{} {} ", format!("【{}】", name).cyan(), ">".bright_green())
    }
}
