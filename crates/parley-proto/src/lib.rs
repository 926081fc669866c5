//! Parley wire protocol
//!
//! Event names, payload types and the JSON envelope exchanged between a chat
//! client and the room server. Every transport message is a single text frame
//! shaped `["<event>", {payload}]`.
//!
//! # Components
//!
//! - [`Outbound`]: events the client emits (join, language change, send)
//! - [`Inbound`]: events the server pushes (messages, notices, roster)
//! - [`Language`]: closed set of display languages agreed with the server
//! - [`payloads`]: the structured payload carried by each event

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod event;
pub mod language;
pub mod payloads;

pub use errors::{ProtocolError, Result};
pub use event::{Inbound, Outbound, names};
pub use language::Language;
pub use payloads::{
    JoinRequest, LanguageChangeRequest, LanguageChanged, PresenceNotice, ReceivedMessage,
    RosterUpdate, SendMessage,
};
