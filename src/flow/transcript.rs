//! Conversation transcript
//!
//! An append-only list of messages. The single exception to append-only is
//! the pending placeholder shown while a search is outstanding: it is always
//! the last message, at most one exists, and it is replaced in place by the
//! results or error message.

use crate::catalog::SelectionOption;
use crate::flow::accumulator::DatePreset;
use crate::flow::step::Step;
use crate::gateway::GameResult;

use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// The person being helped
    User,
    /// The controller
    System,
}

/// Structured data carried by a system message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Attachment {
    /// Candidate options for a selection step
    Options {
        /// Step the options belong to
        step: Step,
        /// Options offered
        candidates: Vec<SelectionOption>,
    },
    /// Release window presets for the date step
    DateRanges {
        /// Presets offered
        presets: Vec<DatePreset>,
    },
    /// Games returned by a search
    Results {
        /// Games in gateway order
        games: Vec<GameResult>,
        /// Whether a restart control is offered
        restartable: bool,
    },
    /// A failed search or catalog load
    Error {
        /// Whether a restart control is offered
        restartable: bool,
    },
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    /// Identifier, unique within the transcript
    pub id: u64,
    /// Author
    pub author: Author,
    /// Display text
    pub text: String,
    /// Structured payload, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Whether this is the in-flight search placeholder
    #[serde(default)]
    pub is_pending: bool,
}

/// Ordered message list with at most one pending entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<TranscriptMessage>,
    next_id: u64,
}

impl Transcript {
    /// Creates an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in order
    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    /// Most recently appended message
    pub fn last(&self) -> Option<&TranscriptMessage> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a pending placeholder is present
    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(|m| m.is_pending)
    }

    /// Drop every message
    ///
    /// Identifiers keep increasing across clears so a stale id from a
    /// previous conversation never names a new message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn push(
        &mut self,
        author: Author,
        text: impl Into<String>,
        attachment: Option<Attachment>,
        is_pending: bool,
    ) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.messages.push(TranscriptMessage {
            id,
            author,
            text: text.into(),
            attachment,
            is_pending,
        });
        id
    }

    /// Append a system message
    pub fn push_system(&mut self, text: impl Into<String>, attachment: Option<Attachment>) -> u64 {
        self.push(Author::System, text, attachment, false)
    }

    /// Append a user message
    pub fn push_user(&mut self, text: impl Into<String>) -> u64 {
        self.push(Author::User, text, None, false)
    }

    /// Append the pending placeholder
    ///
    /// Returns `None` without appending if one is already present.
    pub fn push_pending(&mut self, text: impl Into<String>) -> Option<u64> {
        if self.has_pending() {
            return None;
        }
        Some(self.push(Author::System, text, None, true))
    }

    /// Replace the pending placeholder with a settled system message
    ///
    /// The replacement keeps the placeholder's position and id. If no
    /// placeholder exists the message is appended instead.
    pub fn replace_pending(&mut self, text: impl Into<String>, attachment: Option<Attachment>) -> u64 {
        match self.messages.iter_mut().find(|m| m.is_pending) {
            Some(message) => {
                message.text = text.into();
                message.attachment = attachment;
                message.is_pending = false;
                message.id
            }
            None => self.push_system(text, attachment),
        }
    }
}
