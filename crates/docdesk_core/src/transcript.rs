use std::fmt;

use crate::FactCheckReport;

/// Position of a message in its transcript; assigned once, never reused.
pub type SequenceIndex = u64;

/// Content shown in an assistant placeholder until the answer arrives.
pub const THINKING_PLACEHOLDER: &str = "Thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    FactCheck,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Pending,
    Resolved,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Answer {
        answer: String,
        source: Option<String>,
    },
    FactCheck(FactCheckReport),
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageContent::Text(text.into())
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageContent::Text(text) => write!(f, "{text}"),
            MessageContent::Answer {
                answer,
                source: Some(source),
            } if !source.is_empty() => write!(f, "{answer}\nSource: {source}"),
            MessageContent::Answer { answer, .. } => write!(f, "{answer}"),
            MessageContent::FactCheck(report) => write!(f, "{report}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sequence_index: SequenceIndex,
    pub role: Role,
    pub content: MessageContent,
    pub status: MessageStatus,
}

/// Append-only message log. Display order is insertion order; only the
/// content and status of a pending message may change afterwards, in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_index: SequenceIndex,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns its sequence index.
    ///
    /// Assistant messages start out `Pending` (placeholders), error messages
    /// `Failed`, everything else `Resolved`.
    pub fn append(&mut self, role: Role, content: MessageContent) -> SequenceIndex {
        let status = match role {
            Role::Assistant => MessageStatus::Pending,
            Role::Error => MessageStatus::Failed,
            Role::User | Role::FactCheck => MessageStatus::Resolved,
        };
        let sequence_index = self.next_index;
        self.next_index += 1;
        self.messages.push(Message {
            sequence_index,
            role,
            content,
            status,
        });
        sequence_index
    }

    /// Replaces a pending message's content and marks it resolved.
    /// Returns `false` (and changes nothing) for unknown or finalized indices.
    pub fn resolve(&mut self, index: SequenceIndex, content: MessageContent) -> bool {
        self.finalize(index, content, MessageStatus::Resolved)
    }

    /// Replaces a pending message's content and marks it failed.
    /// Returns `false` (and changes nothing) for unknown or finalized indices.
    pub fn fail(&mut self, index: SequenceIndex, content: impl Into<String>) -> bool {
        self.finalize(
            index,
            MessageContent::Text(content.into()),
            MessageStatus::Failed,
        )
    }

    /// Discards every message and restarts numbering at zero.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.next_index = 0;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: SequenceIndex) -> Option<&Message> {
        self.messages.iter().find(|m| m.sequence_index == index)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent assistant message that holds a real answer.
    pub fn last_answer(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant && m.status == MessageStatus::Resolved)
    }

    fn finalize(
        &mut self,
        index: SequenceIndex,
        content: MessageContent,
        status: MessageStatus,
    ) -> bool {
        match self
            .messages
            .iter_mut()
            .find(|m| m.sequence_index == index)
        {
            Some(message) if message.status == MessageStatus::Pending => {
                message.content = content;
                message.status = status;
                true
            }
            _ => false,
        }
    }
}
