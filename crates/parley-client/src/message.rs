//! Inbound chat messages as presented to the UI.

use parley_proto::ReceivedMessage;

use crate::Session;

/// A delivered chat message.
///
/// Transient: rendered in arrival order and never stored by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Display name of the author.
    pub sender: String,
    /// Message text, possibly translated by the server.
    pub content: String,
    /// Server-assigned timestamp, rendered as provided.
    pub timestamp: String,
    /// Server translated this message for us.
    pub is_translated: bool,
    /// Author is the local participant.
    pub is_own: bool,
}

impl ChatMessage {
    /// Build from a wire message, deriving `is_own` from the local session.
    pub fn from_wire(message: ReceivedMessage, session: &Session) -> Self {
        let is_own = session.is_own(&message.sender);
        Self {
            sender: message.sender,
            content: message.content,
            timestamp: message.timestamp,
            is_translated: message.is_translated,
            is_own,
        }
    }
}
