//! Session state.
//!
//! The three identity facts (display name, language, room) that answer "who
//! am I in this conversation". Only [`crate::SessionController`] writes them;
//! everything else reads.
//!
//! # Invariants
//!
//! - A joined session always has a complete [`Identity`]: the fields live in
//!   one struct that is either fully present or absent.
//! - Display name and room never change while joined. Language may.

use parley_proto::{JoinRequest, Language};

/// Who we are in the current room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Non-empty display name.
    pub display_name: String,
    /// Current display language.
    pub language: Language,
    /// Non-empty room name.
    pub room: String,
}

impl Identity {
    /// Join request carrying this identity, for initial join and rejoin.
    pub fn join_request(&self) -> JoinRequest {
        JoinRequest {
            display_name: self.display_name.clone(),
            language: self.language,
            room: self.room.clone(),
        }
    }
}

/// Position in the join lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No join attempted, or left.
    #[default]
    Unjoined,
    /// Join request sent; no transport activity seen since.
    Joining,
    /// Server is routing room events to us.
    Joined,
}

/// Session state owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: SessionPhase,
    identity: Option<Identity>,
}

impl Session {
    /// Create an empty, unjoined session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True from a successful join submission until leave.
    pub fn is_joined(&self) -> bool {
        self.identity.is_some()
    }

    /// Identity while joined.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Display name while joined.
    pub fn display_name(&self) -> Option<&str> {
        self.identity.as_ref().map(|id| id.display_name.as_str())
    }

    /// Display language while joined.
    pub fn language(&self) -> Option<Language> {
        self.identity.as_ref().map(|id| id.language)
    }

    /// Room while joined.
    pub fn room(&self) -> Option<&str> {
        self.identity.as_ref().map(|id| id.room.as_str())
    }

    /// Whether `sender` is the local participant.
    pub fn is_own(&self, sender: &str) -> bool {
        self.display_name() == Some(sender)
    }

    pub(crate) fn begin(&mut self, identity: Identity) {
        self.identity = Some(identity);
        self.phase = SessionPhase::Joining;
    }

    /// Move `Joining` to `Joined`. Returns `true` on transition.
    pub(crate) fn promote(&mut self) -> bool {
        if self.phase == SessionPhase::Joining {
            self.phase = SessionPhase::Joined;
            true
        } else {
            false
        }
    }

    /// Returns `true` if the language changed.
    pub(crate) fn set_language(&mut self, language: Language) -> bool {
        match self.identity.as_mut() {
            Some(identity) if identity.language != language => {
                identity.language = language;
                true
            },
            _ => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.identity = None;
        self.phase = SessionPhase::Unjoined;
    }
}
