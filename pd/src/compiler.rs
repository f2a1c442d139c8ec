//! Prompt compilation
//!
//! Substitutes user-supplied values into a template body and optionally
//! prefixes the instruction to take attached sources into account.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::InputError;
use crate::placeholder;

/// Instruction placed before the prompt when attached sources should be used
pub const SOURCE_INSTRUCTION: &str =
    "【重要】添付したソース（議事録や資料）の内容を前提知識として踏まえた上で、以下の指示に従ってください。";

/// Placeholder values for one compilation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInputs {
    values: BTreeMap<String, String>,
}

impl UserInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for a placeholder, replacing any previous one
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse `NAME=VALUE` assignments; the first `=` separates name and value
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inputs = Self::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (name, value) = assignment
                .split_once('=')
                .ok_or_else(|| InputError::MissingSeparator(assignment.to_string()))?;
            inputs.insert(name, value);
        }
        Ok(inputs)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UserInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut inputs = Self::new();
        for (k, v) in iter {
            inputs.insert(k, v);
        }
        inputs
    }
}

/// Render the final prompt text
///
/// Every `【name】` and `[name]` whose value is non-empty is replaced; other
/// placeholders are left as written. Substitution is a single pass over
/// `body`, so a value that itself contains bracketed text is inserted as is.
pub fn compile(body: &str, inputs: &UserInputs, prepend_instruction: bool) -> String {
    debug!(body_len = body.len(), inputs = inputs.len(), prepend_instruction, "compile: called");
    let mut prompt = placeholder::replace_all(body, |name| {
        inputs.get(name).filter(|v| !v.is_empty()).map(str::to_string)
    });

    if prepend_instruction {
        debug!("compile: prepending source instruction");
        prompt = format!("{}\n\n{}", SOURCE_INSTRUCTION, prompt);
    }
    prompt
}
