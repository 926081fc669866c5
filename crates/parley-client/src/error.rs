//! Client error types.
//!
//! Every variant rejects a single intent and leaves session state untouched.
//! Transport failures are not errors here: they reach the controller as
//! lifecycle events and only change the health status.

use std::time::Duration;

use thiserror::Error;

/// Join form is missing a required field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Display name is empty after trimming.
    #[error("display name is required")]
    MissingDisplayName,

    /// No language was selected.
    #[error("language is required")]
    MissingLanguage,
}

/// Rejected user intent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Join form failed validation.
    #[error("invalid join: {0}")]
    Validation(#[from] ValidationError),

    /// Join submitted while a session is already active.
    #[error("already joined room {room}")]
    AlreadyJoined {
        /// Room of the active session.
        room: String,
    },

    /// Intent requires an active session.
    #[error("not in a room")]
    NotJoined,

    /// Message send attempted while the transport is down.
    #[error("not connected")]
    Offline,

    /// Message send attempted during the send cooldown.
    #[error("sending too fast, retry in {remaining:?}")]
    CoolingDown {
        /// Time left before sending is allowed again.
        remaining: Duration,
    },
}

impl ClientError {
    /// Returns true if the same intent may succeed later without user changes.
    ///
    /// Cooldowns expire and connections come back; a bad join form or a
    /// missing session needs the user to act.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Offline | Self::CoolingDown { .. })
    }
}
