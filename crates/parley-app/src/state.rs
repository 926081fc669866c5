//! Observable application state types.
//!
//! These structures serve as the "View Model" for the transcript. Messages and
//! notices interleave in arrival order; nothing is persisted.

use parley_client::{ChatMessage, Notice};

/// One line in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Chat message.
    Message(ChatMessage),
    /// System notice (join, leave, language change).
    Notice(Notice),
}

/// Transcript of the current session, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Only the chat messages, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(message) => Some(message),
            Entry::Notice(_) => None,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
