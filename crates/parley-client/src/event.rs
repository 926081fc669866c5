//! Client events and actions.

use parley_proto::{Inbound, Language, Outbound};

use crate::{Banner, ChatMessage, ConnectionHealth, Identity};

/// Join form as submitted by the user.
///
/// Validation happens in the controller: the name must be non-empty after
/// trimming, a language must be chosen, and a blank room falls back to the
/// configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinForm {
    /// Display name, untrimmed.
    pub display_name: String,
    /// Selected language. `None` if nothing was picked.
    pub language: Option<Language>,
    /// Room name, untrimmed. May be blank.
    pub room: String,
}

impl JoinForm {
    /// Create a join form.
    pub fn new(
        display_name: impl Into<String>,
        language: Option<Language>,
        room: impl Into<String>,
    ) -> Self {
        Self { display_name: display_name.into(), language, room: room.into() }
    }
}

/// Notifications from the transport channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// First successful connection.
    Connected,
    /// Connection re-established after a drop.
    Reconnected,
    /// Established connection was lost.
    Disconnected {
        /// Transport-level reason.
        reason: String,
    },
    /// Connection attempt failed.
    ConnectError {
        /// Transport-level reason.
        reason: String,
    },
    /// Frame decoded from the server.
    Received(Inbound),
}

/// Events the caller feeds into the controller.
///
/// The caller is responsible for:
/// - Forwarding transport lifecycle changes and decoded frames
/// - Forwarding user intents
/// - Driving time forward via ticks so timers can expire
///
/// Generic over `I` (Instant type) to support both production and simulated
/// clocks.
#[derive(Debug, Clone)]
pub enum ClientEvent<I = std::time::Instant> {
    /// Something happened on the transport.
    Transport(TransportEvent),

    /// User submitted the join form.
    SubmitJoin(JoinForm),

    /// User wants to post a message.
    SendMessage {
        /// Raw text from the input box.
        content: String,
    },

    /// User picked a new display language.
    ChangeLanguage {
        /// Requested language.
        language: Language,
    },

    /// User wants to leave. Destructive: tears down the transport.
    Leave,

    /// Time tick for timer expiry.
    Tick {
        /// Current time from the environment.
        now: I,
    },
}

/// Kind of transcript notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Someone joined the room.
    UserJoined,
    /// Someone left the room.
    UserLeft,
    /// Our language change was confirmed.
    LanguageChanged,
}

/// System line for the transcript. Cosmetic only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// What the notice is about.
    pub kind: NoticeKind,
    /// Text to display.
    pub text: String,
}

/// Actions the controller produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Send an event to the server.
    Send(Outbound),

    /// Tear down the transport channel.
    Disconnect,

    /// Join submitted; session state now holds this identity.
    SessionStarted(Identity),

    /// Server activity observed after the join request.
    SessionJoined,

    /// Session cleared by leave.
    SessionEnded,

    /// Local display language changed.
    LanguageSet(Language),

    /// Chat message to display.
    DeliverMessage(ChatMessage),

    /// Transcript notice to display.
    Notice(Notice),

    /// Roster replaced. Carries the full ordered membership.
    RosterReplaced(Vec<String>),

    /// Connection health changed.
    HealthChanged(ConnectionHealth),

    /// Translation service availability changed.
    TranslationAvailability(bool),

    /// Show a status banner.
    ShowBanner(Banner),

    /// Hide the status banner.
    DismissBanner,

    /// Whether the send button should be enabled.
    SendAvailability(bool),
}
