//! Session-to-Application translation layer.
//!
//! The [`Bridge`] wraps the low-level [`parley_client::SessionController`] and
//! adapts it to the high-level application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts high-level [`crate::AppAction`] into controller events.
//! - Accumulates outgoing [`Outbound`] requests to be sent by the driver in
//!   the next I/O cycle, and records when the controller asks for the
//!   transport to be torn down.
//! - Interprets results from the controller and converts them back into
//!   [`crate::AppEvent`]s to update the UI.
//! - Manages time ticks generically to support both real-time execution and
//!   deterministic simulation.

use parley_client::{
    ClientAction, ClientConfig, ClientError, ClientEvent, Environment, Outbound,
    SessionController, TransportEvent,
};

use crate::{AppAction, AppEvent};

/// Bridge between App and session logic.
///
/// Generic over Environment to support both production and simulation.
/// The Instant type is determined by the Environment's associated type.
pub struct Bridge<E: Environment> {
    controller: SessionController<E>,
    outgoing: Vec<Outbound>,
    disconnect: bool,
}

impl<E: Environment> Bridge<E> {
    /// Create a new Bridge with the given environment and configuration.
    pub fn new(env: E, config: ClientConfig) -> Self {
        Self { controller: SessionController::new(env, config), outgoing: Vec::new(), disconnect: false }
    }

    /// Underlying controller, for inspection.
    pub fn controller(&self) -> &SessionController<E> {
        &self.controller
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        let event = match action {
            AppAction::Join(form) => ClientEvent::SubmitJoin(form),
            AppAction::SendMessage { content } => ClientEvent::SendMessage { content },
            AppAction::ChangeLanguage { language } => ClientEvent::ChangeLanguage { language },
            AppAction::Leave => ClientEvent::Leave,
            AppAction::Render | AppAction::Quit | AppAction::Connect { .. } => return vec![],
        };

        let result = self.controller.handle(event);
        self.handle_client_result(result)
    }

    /// Handle a lifecycle change or inbound event from the transport.
    pub fn handle_transport(&mut self, event: TransportEvent) -> Vec<AppEvent> {
        let result = self.controller.handle(ClientEvent::Transport(event));
        self.handle_client_result(result)
    }

    /// Process a time tick.
    pub fn handle_tick(&mut self, now: E::Instant) -> Vec<AppEvent> {
        let result = self.controller.handle(ClientEvent::Tick { now });
        self.handle_client_result(result)
    }

    /// Take pending outgoing requests.
    pub fn take_outgoing(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outgoing)
    }

    /// Whether the controller asked for the transport to close. Resets the
    /// flag.
    pub fn take_disconnect(&mut self) -> bool {
        std::mem::take(&mut self.disconnect)
    }

    fn handle_client_result(
        &mut self,
        result: Result<Vec<ClientAction>, ClientError>,
    ) -> Vec<AppEvent> {
        match result {
            Ok(actions) => self.process_client_actions(actions),
            Err(e) if e.is_transient() => {
                tracing::debug!(error = %e, "intent rejected");
                vec![AppEvent::Error { message: e.to_string() }]
            },
            Err(e) => {
                tracing::warn!(error = %e, "intent rejected");
                vec![AppEvent::Error { message: e.to_string() }]
            },
        }
    }

    fn process_client_actions(&mut self, actions: Vec<ClientAction>) -> Vec<AppEvent> {
        let mut events = Vec::new();

        for action in actions {
            match action {
                ClientAction::Send(outbound) => self.outgoing.push(outbound),
                ClientAction::Disconnect => self.disconnect = true,
                ClientAction::SessionStarted(identity) => {
                    events.push(AppEvent::SessionStarted { identity });
                },
                ClientAction::SessionJoined => events.push(AppEvent::SessionJoined),
                ClientAction::SessionEnded => events.push(AppEvent::SessionEnded),
                ClientAction::LanguageSet(language) => {
                    events.push(AppEvent::LanguageSet { language });
                },
                ClientAction::DeliverMessage(message) => {
                    events.push(AppEvent::MessageReceived(message));
                },
                ClientAction::Notice(notice) => events.push(AppEvent::Notice(notice)),
                ClientAction::RosterReplaced(members) => {
                    events.push(AppEvent::RosterReplaced { members });
                },
                ClientAction::HealthChanged(health) => events.push(AppEvent::HealthChanged(health)),
                ClientAction::TranslationAvailability(available) => {
                    events.push(AppEvent::TranslationAvailability { available });
                },
                ClientAction::ShowBanner(banner) => events.push(AppEvent::BannerShown(banner)),
                ClientAction::DismissBanner => events.push(AppEvent::BannerDismissed),
                ClientAction::SendAvailability(can_send) => {
                    events.push(AppEvent::SendAvailability { can_send });
                },
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use parley_client::{JoinForm, Language, SystemEnv};

    use super::*;

    fn bridge() -> Bridge<SystemEnv> {
        Bridge::new(SystemEnv, ClientConfig::default())
    }

    #[test]
    fn join_produces_outgoing_request() {
        let mut bridge = bridge();
        let _ = bridge.handle_transport(TransportEvent::Connected);

        let events = bridge.process_app_action(AppAction::Join(JoinForm::new(
            "alice",
            Some(Language::English),
            "",
        )));

        assert!(events.iter().any(|e| matches!(e, AppEvent::SessionStarted { .. })));
        assert!(matches!(bridge.take_outgoing().as_slice(), [Outbound::Join(_)]));
        assert!(bridge.take_outgoing().is_empty());
    }

    #[test]
    fn send_before_join_produces_error() {
        let mut bridge = bridge();
        let events = bridge.process_app_action(AppAction::SendMessage { content: "hi".into() });

        assert!(events.iter().any(|e| matches!(e, AppEvent::Error { .. })));
        assert!(bridge.take_outgoing().is_empty());
    }

    #[test]
    fn leave_requests_disconnect() {
        let mut bridge = bridge();
        let _ = bridge.handle_transport(TransportEvent::Connected);
        let _ = bridge.process_app_action(AppAction::Join(JoinForm::new(
            "alice",
            Some(Language::English),
            "",
        )));

        let events = bridge.process_app_action(AppAction::Leave);

        assert!(events.contains(&AppEvent::SessionEnded));
        assert!(bridge.take_disconnect());
        assert!(!bridge.take_disconnect());
    }

    #[test]
    fn ui_only_actions_are_ignored() {
        let mut bridge = bridge();
        assert!(bridge.process_app_action(AppAction::Render).is_empty());
        assert!(bridge.process_app_action(AppAction::Quit).is_empty());
    }
}
