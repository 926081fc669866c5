//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the system at a point in time.
//! Invariants operate on snapshots rather than live state so that every check
//! sees the same moment.

use std::collections::BTreeMap;

use parley_app::App;
use parley_client::{ConnectionHealth, Environment, Identity, SessionController, SessionPhase};
use serde::Serialize;

/// Snapshot of the entire system state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemSnapshot {
    /// Per-client state snapshots.
    pub clients: Vec<ClientSnapshot>,
    /// Server-side membership per room, in the order the server reports it.
    pub rooms: BTreeMap<String, Vec<String>>,
    /// No input or traffic is waiting anywhere.
    pub quiescent: bool,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no clients).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot with a single client.
    pub fn single(client: ClientSnapshot) -> Self {
        Self { clients: vec![client], ..Self::default() }
    }

    /// Add a client snapshot.
    pub fn add_client(&mut self, client: ClientSnapshot) {
        self.clients.push(client);
    }
}

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PhaseView {
    /// Not in a session.
    #[default]
    Unjoined,
    /// Join sent, server not heard from.
    Joining,
    /// Server routing room events to us.
    Joined,
}

impl From<SessionPhase> for PhaseView {
    fn from(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Unjoined => Self::Unjoined,
            SessionPhase::Joining => Self::Joining,
            SessionPhase::Joined => Self::Joined,
        }
    }
}

/// Connection health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum HealthView {
    /// No lifecycle event yet.
    #[default]
    Connecting,
    /// Transport up.
    Connected,
    /// Transport down.
    Disconnected,
}

impl From<ConnectionHealth> for HealthView {
    fn from(health: ConnectionHealth) -> Self {
        match health {
            ConnectionHealth::Connecting => Self::Connecting,
            ConnectionHealth::Connected => Self::Connected,
            ConnectionHealth::Disconnected => Self::Disconnected,
        }
    }
}

/// Session identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityView {
    /// Display name.
    pub display_name: String,
    /// Language code.
    pub language: String,
    /// Room name.
    pub room: String,
}

impl From<&Identity> for IdentityView {
    fn from(identity: &Identity) -> Self {
        Self {
            display_name: identity.display_name.clone(),
            language: identity.language.code().to_string(),
            room: identity.room.clone(),
        }
    }
}

/// Session state as seen by one layer (App view model or controller).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// Identity while in a session.
    pub identity: Option<IdentityView>,
    /// Server has answered the join.
    pub joined: bool,
    /// Room members in server order.
    pub roster: Vec<String>,
    /// Connection health.
    pub health: HealthView,
    /// Translation assumed available.
    pub translation_available: bool,
    /// Visible banner text.
    pub banner: Option<String>,
    /// Send control enabled.
    pub can_send: bool,
}

/// Snapshot of a single client's observable state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientSnapshot {
    /// Client index in the world.
    pub id: usize,
    /// Runtime still running (not quit).
    pub active: bool,
    /// Link to the server is up.
    pub online: bool,
    /// Controller lifecycle phase.
    pub phase: PhaseView,
    /// What the App shows.
    pub app: SessionView,
    /// What the controller holds.
    pub controller: SessionView,
    /// Transcript lines in arrival order.
    pub transcript: Vec<String>,
}

impl ClientSnapshot {
    /// Create an empty snapshot for client `id`.
    pub fn new(id: usize) -> Self {
        Self { id, ..Self::default() }
    }

    /// Capture App and controller state.
    pub fn capture<E: Environment>(
        id: usize,
        app: &App,
        controller: &SessionController<E>,
    ) -> Self {
        let session = controller.session();
        let status = controller.status();

        let controller_view = SessionView {
            identity: session.identity().map(IdentityView::from),
            joined: session.phase() == SessionPhase::Joined,
            roster: controller.presence().members().to_vec(),
            health: status.health().into(),
            translation_available: status.translation_available(),
            banner: status.banner().map(|b| b.text.clone()),
            can_send: controller.can_send(),
        };

        let app_view = SessionView {
            identity: app.identity().map(IdentityView::from),
            joined: app.is_joined(),
            roster: app.roster().to_vec(),
            health: app.health().into(),
            translation_available: app.translation_available(),
            banner: app.banner().map(|b| b.text.clone()),
            can_send: app.can_send(),
        };

        let transcript = app
            .transcript()
            .entries()
            .iter()
            .map(|entry| match entry {
                parley_app::Entry::Message(m) => {
                    let own = if m.is_own { " (you)" } else { "" };
                    let translated = if m.is_translated { " [translated]" } else { "" };
                    format!("[{}] {}{own}: {}{translated}", m.timestamp, m.sender, m.content)
                },
                parley_app::Entry::Notice(n) => format!("* {}", n.text),
            })
            .collect();

        Self {
            id,
            active: true,
            online: false,
            phase: session.phase().into(),
            app: app_view,
            controller: controller_view,
            transcript,
        }
    }

    /// Room the controller is in, if any.
    pub fn room(&self) -> Option<&str> {
        self.controller.identity.as_ref().map(|i| i.room.as_str())
    }
}
