//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the [`crate::App`]
//! state machine. Apart from `Tick`, every variant is translated by the
//! [`crate::Bridge`] from a session controller action.

use parley_client::{Banner, ChatMessage, ConnectionHealth, Identity, Language, Notice};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Join request sent; identity is now set locally.
    SessionStarted {
        /// Identity we joined with.
        identity: Identity,
    },

    /// Server activity observed after the join.
    SessionJoined,

    /// Session cleared by leave.
    SessionEnded,

    /// Local language changed.
    LanguageSet {
        /// Language now in effect.
        language: Language,
    },

    /// Chat message received.
    MessageReceived(ChatMessage),

    /// Informational line for the transcript.
    Notice(Notice),

    /// Roster replaced by a new snapshot.
    RosterReplaced {
        /// Members in server order.
        members: Vec<String>,
    },

    /// Connection health changed.
    HealthChanged(ConnectionHealth),

    /// Translation availability changed.
    TranslationAvailability {
        /// Whether translation is assumed available.
        available: bool,
    },

    /// Status banner shown.
    BannerShown(Banner),

    /// Status banner dismissed.
    BannerDismissed,

    /// Send control enabled or disabled.
    SendAvailability {
        /// Whether a message may be sent now.
        can_send: bool,
    },

    /// Error occurred.
    Error {
        /// Error description.
        message: String,
    },
}
