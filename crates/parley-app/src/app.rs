//! Application state machine.
//!
//! This module defines the [`App`] state machine, which holds the view model
//! of the chat completely decoupled from I/O and session mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Keeps the transcript of messages and notices in arrival order.
//! - Mirrors the roster, identity, language and connection status reported
//!   by the session controller.
//! - Turns user intents into actions for the bridge.

use parley_client::{Banner, ConnectionHealth, Identity, JoinForm, Language};

use crate::{AppAction, AppEvent, Entry, Transcript};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Server URL for connection.
    url: String,
    /// Identity once a join was submitted. `None` before join and after leave.
    identity: Option<Identity>,
    /// Server has answered since the join.
    joined: bool,
    /// Messages and notices.
    transcript: Transcript,
    /// Members in server order.
    roster: Vec<String>,
    /// Connection health.
    health: ConnectionHealth,
    /// Visible status banner. `None` if dismissed.
    banner: Option<Banner>,
    /// Translation assumed available.
    translation_available: bool,
    /// Send control enabled.
    can_send: bool,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App with the given server URL.
    pub fn new(url: String) -> Self {
        Self {
            url,
            identity: None,
            joined: false,
            transcript: Transcript::new(),
            roster: Vec::new(),
            health: ConnectionHealth::Connecting,
            banner: None,
            translation_available: false,
            can_send: true,
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::SessionStarted { identity } => {
                self.status_message = Some(format!("Joining #{}...", identity.room));
                self.identity = Some(identity);
                self.joined = false;
                vec![AppAction::Render]
            },
            AppEvent::SessionJoined => {
                if let Some(identity) = &self.identity {
                    self.joined = true;
                    self.status_message = Some(format!("Joined #{}", identity.room));
                }
                vec![AppAction::Render]
            },
            AppEvent::SessionEnded => {
                self.identity = None;
                self.joined = false;
                self.roster.clear();
                self.banner = None;
                self.status_message = Some("Left the chat".to_string());
                vec![AppAction::Render, AppAction::Quit]
            },
            AppEvent::LanguageSet { language } => {
                if let Some(identity) = &mut self.identity {
                    identity.language = language;
                }
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived(message) => {
                self.transcript.push(Entry::Message(message));
                vec![AppAction::Render]
            },
            AppEvent::Notice(notice) => {
                self.transcript.push(Entry::Notice(notice));
                vec![AppAction::Render]
            },
            AppEvent::RosterReplaced { members } => {
                self.roster = members;
                vec![AppAction::Render]
            },
            AppEvent::HealthChanged(health) => {
                self.health = health;
                vec![AppAction::Render]
            },
            AppEvent::TranslationAvailability { available } => {
                self.translation_available = available;
                vec![AppAction::Render]
            },
            AppEvent::BannerShown(banner) => {
                self.banner = Some(banner);
                vec![AppAction::Render]
            },
            AppEvent::BannerDismissed => {
                self.banner = None;
                vec![AppAction::Render]
            },
            AppEvent::SendAvailability { can_send } => {
                self.can_send = can_send;
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Initiate connection to the server.
    pub fn connect(&mut self) -> Vec<AppAction> {
        self.health = ConnectionHealth::Connecting;
        vec![AppAction::Connect { url: self.url.clone() }, AppAction::Render]
    }

    /// Submit the join form.
    pub fn join(&mut self, form: JoinForm) -> Vec<AppAction> {
        self.status_message = None;
        vec![AppAction::Join(form), AppAction::Render]
    }

    /// Send a chat message.
    pub fn send_message(&self, content: impl Into<String>) -> Vec<AppAction> {
        vec![AppAction::SendMessage { content: content.into() }, AppAction::Render]
    }

    /// Switch display language.
    pub fn change_language(&self, language: Language) -> Vec<AppAction> {
        vec![AppAction::ChangeLanguage { language }, AppAction::Render]
    }

    /// Leave the room.
    pub fn leave(&self) -> Vec<AppAction> {
        vec![AppAction::Leave, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Server URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Identity in use. `None` when not in a session.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Whether a session exists.
    pub fn in_session(&self) -> bool {
        self.identity.is_some()
    }

    /// Whether the server has answered since the join.
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Current language. `None` when not in a session.
    pub fn language(&self) -> Option<Language> {
        self.identity.as_ref().map(|identity| identity.language)
    }

    /// Transcript of the session.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Members in server order.
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    /// Connection health.
    pub fn health(&self) -> ConnectionHealth {
        self.health
    }

    /// Visible banner. `None` if dismissed.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Whether translation is assumed available.
    pub fn translation_available(&self) -> bool {
        self.translation_available
    }

    /// Whether the send control is enabled.
    pub fn can_send(&self) -> bool {
        self.can_send
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
