pub mod sequencer;

pub use sequencer::{DialogueEvent, DialogueSequencer};

use serde::{Deserialize, Serialize};

/// Ordered narration lines, consumed front to back.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogueScript {
    messages: Vec<String>,
}

impl DialogueScript {
    pub fn new(messages: Vec<String>) -> Self {
        DialogueScript { messages }
    }

    pub fn from_lines(lines: &[&str]) -> Self {
        DialogueScript::new(lines.iter().map(|l| l.to_string()).collect())
    }

    pub fn message(&self, index: usize) -> Option<&str> {
        self.messages.get(index).map(String::as_str)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
