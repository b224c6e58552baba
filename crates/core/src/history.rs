//! Run-local state: the history log and the notepad.
//!
//! `History` is the ordered record of everything a run produced: model
//! parts and plain notice strings (tool results, error notices). It is
//! append-only for the lifetime of a run; prompt construction takes
//! *views* over a suffix of it rather than ever deleting entries.
//!
//! `Notepad` is the durable scratch buffer: it survives history truncation
//! by design, which is its entire purpose.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::part::ModelPart;

/// One entry in the run history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    /// A unit the model emitted (reasoning text or a function call).
    Part(ModelPart),

    /// A plain string: tool result, acknowledgment, or error notice.
    Notice(String),
}

/// Ordered, append-only log of model outputs and tool results for one run.
///
/// Backed by a deque so prompt composition can take cheap suffix views
/// while the full record stays intact.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a model part.
    pub fn push_part(&mut self, part: ModelPart) {
        self.entries.push_back(HistoryEntry::Part(part));
    }

    /// Append a plain notice string (tool result, acknowledgment, error).
    pub fn push_notice(&mut self, notice: impl Into<String>) {
        self.entries.push_back(HistoryEntry::Notice(notice.into()));
    }

    /// Append every part of a model reply, in emission order.
    pub fn extend_parts(&mut self, parts: impl IntoIterator<Item = ModelPart>) {
        for part in parts {
            self.push_part(part);
        }
    }

    /// Iterate over all entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Render the suffix of the history starting at `skip` as prompt text.
    ///
    /// This is a projection: it never mutates the underlying record.
    pub fn render_from(&self, skip: usize) -> String {
        let mut out = String::new();
        for entry in self.entries.iter().skip(skip) {
            if !out.is_empty() {
                out.push('\n');
            }
            match entry {
                HistoryEntry::Part(ModelPart::Text { text }) => out.push_str(text),
                HistoryEntry::Part(ModelPart::FunctionCall { name, arguments }) => {
                    let args = serde_json::Value::Object(arguments.clone()).to_string();
                    out.push_str(&format!("[function call] {name}({args})"));
                }
                HistoryEntry::Notice(notice) => out.push_str(notice),
            }
        }
        out
    }

    /// Render the full history as prompt text.
    pub fn render(&self) -> String {
        self.render_from(0)
    }
}

/// Durable, append-only scratch buffer surviving history truncation.
#[derive(Debug, Clone, Default)]
pub struct Notepad {
    content: String,
}

impl Notepad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append content, preceded by a blank line.
    pub fn append(&mut self, content: &str) {
        self.content.push_str("\n\n");
        self.content.push_str(content);
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
