//! Structured payloads carried by each protocol event.
//!
//! Field names follow the server's wire names (`username`, `users`) while the
//! Rust names describe their meaning. Unknown fields are ignored on decode so
//! the server can add hints without breaking older clients.

use serde::{Deserialize, Serialize};

use crate::Language;

/// Request to join a room. Sent on initial join and on automatic rejoin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Display name chosen by the participant.
    #[serde(rename = "username")]
    pub display_name: String,
    /// Language messages should be delivered in.
    pub language: Language,
    /// Room to join.
    pub room: String,
}

/// Request to change the display language mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageChangeRequest {
    /// New display language.
    pub language: Language,
}

/// Chat message posted by the local participant.
///
/// Sender identity and room are implied by the server-side session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    /// Trimmed, non-empty message text.
    pub content: String,
}

/// Chat message delivered by the server, possibly translated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedMessage {
    /// Display name of the author.
    #[serde(rename = "username")]
    pub sender: String,
    /// Message text in the recipient's language.
    pub content: String,
    /// Server-assigned timestamp, rendered as provided.
    pub timestamp: String,
    /// Set when `content` differs from the author's original text.
    #[serde(default)]
    pub is_translated: bool,
}

/// Human-readable presence notice (someone joined or left).
///
/// Notices are cosmetic. The roster is only ever changed by [`RosterUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceNotice {
    /// Participant the notice is about, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Text to show in the transcript.
    pub message: String,
}

/// Full snapshot of the room's participants, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterUpdate {
    /// Display names of everyone currently in the room.
    #[serde(rename = "users")]
    pub members: Vec<String>,
}

/// Server confirmation of a language change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageChanged {
    /// Language now in effect for this session.
    pub language: Language,
}
