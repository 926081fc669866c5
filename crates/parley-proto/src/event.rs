//! Event envelope.
//!
//! Every frame is a two-element JSON array: the event name followed by its
//! payload object. The name selects the payload type, so decoding is a match
//! on the name followed by a typed deserialization of the payload.

use serde::Serialize;
use serde_json::Value;

use crate::{
    JoinRequest, LanguageChangeRequest, LanguageChanged, PresenceNotice, ReceivedMessage,
    RosterUpdate, SendMessage,
    errors::{ProtocolError, Result},
};

/// Wire names of protocol events.
pub mod names {
    /// Client: join or rejoin a room.
    pub const JOIN_CHAT: &str = "join_chat";
    /// Client: change display language.
    pub const CHANGE_LANGUAGE: &str = "change_language";
    /// Client: post a chat message.
    pub const SEND_MESSAGE: &str = "send_message";
    /// Server: chat message for this participant.
    pub const RECEIVE_MESSAGE: &str = "receive_message";
    /// Server: someone joined the room.
    pub const USER_JOINED: &str = "user_joined";
    /// Server: someone left the room.
    pub const USER_LEFT: &str = "user_left";
    /// Server: full roster snapshot.
    pub const UPDATE_USERS: &str = "update_users";
    /// Server: language change confirmed.
    pub const LANGUAGE_CHANGED: &str = "language_changed";
}

/// Events sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Join (or rejoin) a room.
    Join(JoinRequest),
    /// Change display language.
    ChangeLanguage(LanguageChangeRequest),
    /// Post a chat message.
    SendMessage(SendMessage),
}

impl Outbound {
    /// Wire name of this event.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => names::JOIN_CHAT,
            Self::ChangeLanguage(_) => names::CHANGE_LANGUAGE,
            Self::SendMessage(_) => names::SEND_MESSAGE,
        }
    }

    /// Encode as a text frame.
    pub fn encode(&self) -> Result<String> {
        match self {
            Self::Join(p) => encode_envelope(self.name(), p),
            Self::ChangeLanguage(p) => encode_envelope(self.name(), p),
            Self::SendMessage(p) => encode_envelope(self.name(), p),
        }
    }

    /// Decode a text frame sent by a client.
    pub fn decode(text: &str) -> Result<Self> {
        let (name, payload) = split_envelope(text)?;
        match name.as_str() {
            names::JOIN_CHAT => Ok(Self::Join(serde_json::from_value(payload)?)),
            names::CHANGE_LANGUAGE => Ok(Self::ChangeLanguage(serde_json::from_value(payload)?)),
            names::SEND_MESSAGE => Ok(Self::SendMessage(serde_json::from_value(payload)?)),
            _ => Err(ProtocolError::UnknownEvent(name)),
        }
    }
}

/// Events pushed from server to client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Chat message.
    Message(ReceivedMessage),
    /// Presence notice: someone joined.
    UserJoined(PresenceNotice),
    /// Presence notice: someone left.
    UserLeft(PresenceNotice),
    /// Full roster snapshot.
    Roster(RosterUpdate),
    /// Language change confirmed.
    LanguageChanged(LanguageChanged),
}

impl Inbound {
    /// Wire name of this event.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Message(_) => names::RECEIVE_MESSAGE,
            Self::UserJoined(_) => names::USER_JOINED,
            Self::UserLeft(_) => names::USER_LEFT,
            Self::Roster(_) => names::UPDATE_USERS,
            Self::LanguageChanged(_) => names::LANGUAGE_CHANGED,
        }
    }

    /// Encode as a text frame.
    pub fn encode(&self) -> Result<String> {
        match self {
            Self::Message(p) => encode_envelope(self.name(), p),
            Self::UserJoined(p) | Self::UserLeft(p) => encode_envelope(self.name(), p),
            Self::Roster(p) => encode_envelope(self.name(), p),
            Self::LanguageChanged(p) => encode_envelope(self.name(), p),
        }
    }

    /// Decode a text frame sent by the server.
    pub fn decode(text: &str) -> Result<Self> {
        let (name, payload) = split_envelope(text)?;
        match name.as_str() {
            names::RECEIVE_MESSAGE => Ok(Self::Message(serde_json::from_value(payload)?)),
            names::USER_JOINED => Ok(Self::UserJoined(serde_json::from_value(payload)?)),
            names::USER_LEFT => Ok(Self::UserLeft(serde_json::from_value(payload)?)),
            names::UPDATE_USERS => Ok(Self::Roster(serde_json::from_value(payload)?)),
            names::LANGUAGE_CHANGED => Ok(Self::LanguageChanged(serde_json::from_value(payload)?)),
            _ => Err(ProtocolError::UnknownEvent(name)),
        }
    }
}

fn encode_envelope<T: Serialize>(name: &str, payload: &T) -> Result<String> {
    Ok(serde_json::to_string(&(name, payload))?)
}

fn split_envelope(text: &str) -> Result<(String, Value)> {
    serde_json::from_str::<(String, Value)>(text)
        .map_err(|e| ProtocolError::MalformedEnvelope(e.to_string()))
}
