//! Session controller.
//!
//! The [`SessionController`] owns [`Session`] and is the only component that
//! emits join and language-change requests. All inputs go through
//! [`SessionController::handle`], so the transition table below is the whole
//! story.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────┐ SubmitJoin ┌─────────┐ any transport ┌────────┐
//! │ Unjoined │───────────>│ Joining │──────────────>│ Joined │
//! └──────────┘            └─────────┘   activity    └────────┘
//!      ^                       │                      │    ^
//!      │          Leave        │                      │    │ Disconnected (state kept)
//!      └───────────────────────┴──────────────────────┘    │ Reconnected (auto rejoin)
//!                                                          └─┘
//! ```
//!
//! Join and language change are optimistic: local state is written before the
//! server confirms. The protocol has no rejection event, so a confirmation for
//! a language we never asked for is adopted as the server's view.

use std::collections::VecDeque;

use parley_proto::{Inbound, Language, LanguageChangeRequest, Outbound};
use tracing::{debug, info, warn};

use crate::{
    ClientAction, ClientConfig, ClientError, ClientEvent, Environment, Identity, JoinForm,
    MessageDispatcher, Notice, NoticeKind, PresenceTracker, Session, StatusIndicator,
    TransportEvent, ValidationError,
};

/// Session state machine.
///
/// Pure: no I/O. Generic over [`Environment`] so timers run on real or
/// virtual time.
pub struct SessionController<E: Environment> {
    env: E,
    config: ClientConfig,
    session: Session,
    dispatcher: MessageDispatcher<E::Instant>,
    presence: PresenceTracker,
    status: StatusIndicator<E::Instant>,
    /// Language requests not yet confirmed, oldest first.
    in_flight_languages: VecDeque<Language>,
    /// Join submitted while the transport was not connected; sent on the
    /// next connect.
    join_pending: bool,
    /// Leave tore the transport down; late lifecycle events are stale.
    closed: bool,
}

impl<E: Environment> SessionController<E> {
    /// Create a controller with an empty session.
    pub fn new(env: E, config: ClientConfig) -> Self {
        Self {
            dispatcher: MessageDispatcher::new(config.send_cooldown),
            status: StatusIndicator::new(config.banner_dismiss),
            env,
            config,
            session: Session::new(),
            presence: PresenceTracker::new(),
            in_flight_languages: VecDeque::new(),
            join_pending: false,
            closed: false,
        }
    }

    /// Current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current roster.
    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    /// Current connection status.
    pub fn status(&self) -> &StatusIndicator<E::Instant> {
        &self.status
    }

    /// Whether the send control should be enabled.
    pub fn can_send(&self) -> bool {
        self.dispatcher.can_send()
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Process an event and return resulting actions.
    ///
    /// # Errors
    ///
    /// Errors reject a single user intent and never change state:
    /// - `ClientError::Validation` for an incomplete join form
    /// - `ClientError::AlreadyJoined` for a second join
    /// - `ClientError::NotJoined` for send or language change before join
    /// - `ClientError::Offline` for a send while disconnected
    /// - `ClientError::CoolingDown` for a send inside the cooldown window
    pub fn handle(
        &mut self,
        event: ClientEvent<E::Instant>,
    ) -> Result<Vec<ClientAction>, ClientError> {
        match event {
            ClientEvent::Transport(event) => Ok(self.handle_transport(event)),
            ClientEvent::SubmitJoin(form) => self.handle_submit_join(form),
            ClientEvent::SendMessage { content } => self.handle_send_message(&content),
            ClientEvent::ChangeLanguage { language } => self.handle_change_language(language),
            ClientEvent::Leave => Ok(self.handle_leave()),
            ClientEvent::Tick { now } => Ok(self.handle_tick(now)),
        }
    }

    fn handle_submit_join(&mut self, form: JoinForm) -> Result<Vec<ClientAction>, ClientError> {
        if let Some(room) = self.session.room() {
            return Err(ClientError::AlreadyJoined { room: room.to_string() });
        }

        let identity = self.validate_join(form)?;
        let request = identity.join_request();

        info!(room = %identity.room, language = %identity.language, "joining room");

        self.closed = false;
        self.in_flight_languages.clear();
        self.session.begin(identity.clone());

        // The transport may already be up before we hear about it. Sending now
        // could deliver the join and then repeat it on `Connected`.
        if !self.status.is_online() {
            debug!("transport not connected, join deferred");
            self.join_pending = true;
            return Ok(vec![ClientAction::SessionStarted(identity)]);
        }

        self.join_pending = false;
        Ok(vec![ClientAction::Send(Outbound::Join(request)), ClientAction::SessionStarted(identity)])
    }

    fn validate_join(&self, form: JoinForm) -> Result<Identity, ValidationError> {
        let display_name = form.display_name.trim();
        if display_name.is_empty() {
            return Err(ValidationError::MissingDisplayName);
        }

        let Some(language) = form.language else {
            return Err(ValidationError::MissingLanguage);
        };

        let room = match form.room.trim() {
            "" => self.config.default_room.clone(),
            room => room.to_string(),
        };

        Ok(Identity { display_name: display_name.to_string(), language, room })
    }

    fn handle_send_message(&mut self, content: &str) -> Result<Vec<ClientAction>, ClientError> {
        if content.trim().is_empty() {
            return Ok(vec![]);
        }
        if !self.session.is_joined() {
            return Err(ClientError::NotJoined);
        }
        if !self.status.is_online() {
            return Err(ClientError::Offline);
        }

        match self.dispatcher.send(content, self.env.now())? {
            Some(outbound) => {
                Ok(vec![ClientAction::Send(outbound), ClientAction::SendAvailability(false)])
            },
            None => Ok(vec![]),
        }
    }

    fn handle_change_language(
        &mut self,
        language: Language,
    ) -> Result<Vec<ClientAction>, ClientError> {
        if !self.session.set_language(language) {
            return if self.session.is_joined() { Ok(vec![]) } else { Err(ClientError::NotJoined) };
        }

        debug!(%language, "language changed locally, awaiting confirmation");
        self.in_flight_languages.push_back(language);

        Ok(vec![
            ClientAction::LanguageSet(language),
            ClientAction::Send(Outbound::ChangeLanguage(LanguageChangeRequest { language })),
        ])
    }

    fn handle_leave(&mut self) -> Vec<ClientAction> {
        if !self.session.is_joined() {
            debug!("leave while unjoined, ignoring");
            return vec![];
        }

        info!(room = ?self.session.room(), "leaving room");

        self.session.clear();
        self.in_flight_languages.clear();
        self.join_pending = false;
        self.closed = true;

        let mut actions = vec![ClientAction::Disconnect];
        actions.extend(self.status.teardown());
        if !self.presence.is_empty() {
            self.presence.clear();
            actions.push(ClientAction::RosterReplaced(Vec::new()));
        }
        if self.dispatcher.cancel() {
            actions.push(ClientAction::SendAvailability(true));
        }
        actions.push(ClientAction::SessionEnded);
        actions
    }

    fn handle_tick(&mut self, now: E::Instant) -> Vec<ClientAction> {
        let mut actions = Vec::new();
        if self.dispatcher.poll(now) {
            actions.push(ClientAction::SendAvailability(true));
        }
        actions.extend(self.status.poll(now));
        actions
    }

    fn handle_transport(&mut self, event: TransportEvent) -> Vec<ClientAction> {
        if self.closed {
            debug!(?event, "transport event after leave, ignoring");
            return vec![];
        }

        match event {
            TransportEvent::Connected => {
                let mut actions = self.status.on_connected(self.env.now(), false);
                actions.extend(self.resume_session(false));
                actions
            },
            TransportEvent::Reconnected => {
                let mut actions = self.status.on_connected(self.env.now(), true);
                actions.extend(self.resume_session(true));
                actions
            },
            TransportEvent::Disconnected { reason } => {
                info!(%reason, "transport disconnected, session retained");
                self.status.on_disconnected()
            },
            TransportEvent::ConnectError { reason } => {
                warn!(%reason, "transport connect failed");
                self.status.on_connect_error()
            },
            TransportEvent::Received(inbound) => {
                let mut actions = self.promote();
                actions.extend(self.handle_inbound(inbound));
                actions
            },
        }
    }

    /// Re-send the join after a reconnect, or send a join deferred while the
    /// transport was down. Either way it goes out exactly once.
    fn resume_session(&mut self, reconnected: bool) -> Vec<ClientAction> {
        let Some(request) = self.session.identity().map(Identity::join_request) else {
            return vec![];
        };

        if !reconnected && !self.join_pending {
            return self.promote();
        }

        info!(room = %request.room, language = %request.language, "rejoining room");
        self.join_pending = false;
        // The join carries the current language; older requests are moot.
        self.in_flight_languages.clear();

        vec![ClientAction::Send(Outbound::Join(request))]
    }

    fn promote(&mut self) -> Vec<ClientAction> {
        if self.session.promote() {
            debug!(room = ?self.session.room(), "join observed by server");
            vec![ClientAction::SessionJoined]
        } else {
            vec![]
        }
    }

    fn handle_inbound(&mut self, inbound: Inbound) -> Vec<ClientAction> {
        match inbound {
            Inbound::Message(message) => {
                vec![ClientAction::DeliverMessage(self.dispatcher.receive(message, &self.session))]
            },
            Inbound::UserJoined(notice) => vec![ClientAction::Notice(Notice {
                kind: NoticeKind::UserJoined,
                text: notice.message,
            })],
            Inbound::UserLeft(notice) => {
                vec![ClientAction::Notice(Notice { kind: NoticeKind::UserLeft, text: notice.message })]
            },
            Inbound::Roster(update) => {
                if self.presence.replace_roster(update.members) {
                    vec![ClientAction::RosterReplaced(self.presence.members().to_vec())]
                } else {
                    vec![]
                }
            },
            Inbound::LanguageChanged(confirmed) => self.reconcile_language(confirmed.language),
        }
    }

    fn reconcile_language(&mut self, confirmed: Language) -> Vec<ClientAction> {
        let mut actions = vec![ClientAction::Notice(Notice {
            kind: NoticeKind::LanguageChanged,
            text: format!("Your language has been changed to {confirmed}"),
        })];

        match self.in_flight_languages.iter().position(|lang| *lang == confirmed) {
            Some(index) => {
                // Confirmations arrive in request order; anything older was
                // superseded.
                self.in_flight_languages.drain(..=index);
            },
            None => {
                if self.session.set_language(confirmed) {
                    warn!(%confirmed, "server confirmed an unrequested language, adopting it");
                    actions.push(ClientAction::LanguageSet(confirmed));
                }
            },
        }
        actions
    }
}
