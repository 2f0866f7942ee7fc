//! Chat transcript

use std::fmt;

use serde::{Deserialize, Serialize};

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Code written by the code interpreter
    Code,
}

/// One entry of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// Render for a terminal; code is shown with line numbers.
    pub fn render(&self) -> String {
        match self.role {
            Role::Code => self
                .text
                .split('\n')
                .enumerate()
                .map(|(i, line)| format!("{}. {line}", i + 1))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => self.text.clone(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Ordered messages plus the input state of the chat.
///
/// Messages are only ever appended; streaming deltas extend the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
    input_disabled: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether the user may submit a message right now
    pub fn input_disabled(&self) -> bool {
        self.input_disabled
    }

    pub(crate) fn set_input_disabled(&mut self, disabled: bool) {
        self.input_disabled = disabled;
    }

    /// Append a message and return its position.
    pub fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Append `text` to the last message. Returns `None` when the transcript is empty.
    pub fn append_to_last(&mut self, text: &str) -> Option<usize> {
        let index = self.messages.len().checked_sub(1)?;
        self.messages[index].text.push_str(text);
        Some(index)
    }

    /// Rewrite the text of the last message. Returns `None` when the transcript is empty.
    pub fn update_last(&mut self, f: impl FnOnce(&str) -> String) -> Option<usize> {
        let last = self.messages.last_mut()?;
        last.text = f(&last.text);
        Some(self.messages.len() - 1)
    }
}
