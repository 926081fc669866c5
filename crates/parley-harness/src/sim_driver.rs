//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`parley_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! The transport is modelled as an auto-reconnecting channel onto a shared
//! [`SimServer`](crate::SimServer). Tests break and restore the link with
//! [`SimDriver::drop_connection`] and [`SimDriver::restore_connection`];
//! requests sent while the link is down are dropped, as on the real socket.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use parley_app::{App, AppAction, Driver};
use parley_client::{Environment, JoinForm, Language, Outbound, TransportEvent};
use tracing::debug;

use crate::{ConnId, SharedSimServer, SimEnv, SimServer};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Scripted user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Submit the join form.
    Join(JoinForm),
    /// Type and send a message.
    Send(String),
    /// Pick a different language.
    ChangeLanguage(Language),
    /// Leave the room.
    Leave,
    /// Quit without leaving.
    Quit,
}

/// Shared state for input and fault injection.
///
/// This allows injection from outside async contexts.
#[derive(Default)]
struct SharedState {
    inputs: VecDeque<Input>,
    lifecycle: VecDeque<TransportEvent>,
    /// Live server connection. `None` while the link is down.
    conn: Option<ConnId>,
    /// Channel exists (between `connect` and `disconnect`).
    channel_open: bool,
    ever_connected: bool,
    refuse: bool,
    sent: Vec<Outbound>,
    dropped: usize,
    renders: usize,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`parley_app::Runtime`]
/// orchestration code runs in both production and simulation tests.
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    server: SharedSimServer,
    env: SimEnv,
}

impl SimDriver {
    /// Create a driver talking to `server` on `env`'s clock.
    pub fn new(server: SharedSimServer, env: SimEnv) -> Self {
        Self { state: Arc::new(Mutex::new(SharedState::default())), server, env }
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn server(&self) -> MutexGuard<'_, SimServer> {
        self.server.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue user input for the next poll.
    pub fn inject_input(&self, input: Input) {
        self.state().inputs.push_back(input);
    }

    /// Break the link. The server sees the connection close and the client
    /// sees `Disconnected`.
    pub fn drop_connection(&self) {
        let mut state = self.state();
        if let Some(conn) = state.conn.take() {
            debug!(conn, "sim driver: link dropped");
            self.server().disconnect(conn);
            state.lifecycle.push_back(TransportEvent::Disconnected { reason: "link dropped".into() });
        }
    }

    /// Attempt to (re)establish the link, as the transport's backoff would.
    pub fn restore_connection(&self) {
        let mut state = self.state();
        if state.channel_open && state.conn.is_none() {
            self.attempt(&mut state);
        }
    }

    /// Make connection attempts fail until called again with `false`.
    pub fn refuse_connections(&self, refuse: bool) {
        self.state().refuse = refuse;
    }

    /// Whether the link to the server is up.
    pub fn is_online(&self) -> bool {
        self.state().conn.is_some()
    }

    /// Server connection in use. `None` while the link is down.
    pub fn conn(&self) -> Option<ConnId> {
        self.state().conn
    }

    /// Check if there is input or inbound traffic left to process.
    pub fn has_pending(&self) -> bool {
        let state = self.state();
        !state.inputs.is_empty()
            || !state.lifecycle.is_empty()
            || state.conn.is_some_and(|conn| self.server().has_pending(conn))
    }

    /// Take all requests that reached the server.
    pub fn take_sent(&self) -> Vec<Outbound> {
        std::mem::take(&mut self.state().sent)
    }

    /// Number of requests dropped while offline.
    pub fn dropped(&self) -> usize {
        self.state().dropped
    }

    /// Number of render calls.
    pub fn renders(&self) -> usize {
        self.state().renders
    }

    fn attempt(&self, state: &mut SharedState) {
        if state.refuse {
            debug!("sim driver: connection refused");
            state.lifecycle.push_back(TransportEvent::ConnectError {
                reason: "connection refused".into(),
            });
            return;
        }

        let conn = self.server().connect();
        state.conn = Some(conn);
        let event = if state.ever_connected {
            TransportEvent::Reconnected
        } else {
            TransportEvent::Connected
        };
        state.ever_connected = true;
        state.lifecycle.push_back(event);
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = Duration;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        let input = self.state().inputs.pop_front();

        Ok(match input {
            Some(Input::Join(form)) => app.join(form),
            Some(Input::Send(content)) => app.send_message(content),
            Some(Input::ChangeLanguage(language)) => app.change_language(language),
            Some(Input::Leave) => app.leave(),
            Some(Input::Quit) => app.quit(),
            None => vec![],
        })
    }

    async fn send(&mut self, outbound: Outbound) -> Result<(), Self::Error> {
        let mut state = self.state();
        match state.conn {
            Some(conn) => {
                self.server().handle(conn, outbound.clone(), self.env.now());
                state.sent.push(outbound);
            },
            None => {
                debug!(event = outbound.name(), "sim driver: dropped while offline");
                state.dropped += 1;
            },
        }
        Ok(())
    }

    async fn recv(&mut self) -> Option<TransportEvent> {
        let mut state = self.state();
        if let Some(event) = state.lifecycle.pop_front() {
            return Some(event);
        }

        let conn = state.conn?;
        self.server().next_for(conn).map(TransportEvent::Received)
    }

    async fn connect(&mut self, _url: &str) -> Result<(), Self::Error> {
        let mut state = self.state();
        if state.channel_open {
            return Err(SimDriverError("channel already open".into()));
        }
        state.channel_open = true;
        self.attempt(&mut state);
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut state = self.state();
        if let Some(conn) = state.conn.take() {
            self.server().disconnect(conn);
        }
        state.channel_open = false;
        state.lifecycle.clear();
    }

    fn is_connected(&self) -> bool {
        self.state().channel_open
    }

    fn now(&self) -> Self::Instant {
        self.env.now()
    }

    fn render(&mut self, _app: &App) -> Result<(), Self::Error> {
        self.state().renders += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_shared_server;

    fn driver() -> SimDriver {
        SimDriver::new(create_shared_server(), SimEnv::new())
    }

    #[test]
    fn inject_input_queues_input() {
        let driver = driver();
        driver.inject_input(Input::Send("hi".into()));

        assert!(driver.has_pending());
    }

    #[tokio::test]
    async fn connect_announces_connected_then_reconnected() {
        let mut driver = driver();
        driver.connect("sim://").await.unwrap();
        assert_eq!(driver.recv().await, Some(TransportEvent::Connected));

        driver.drop_connection();
        assert!(matches!(driver.recv().await, Some(TransportEvent::Disconnected { .. })));

        driver.restore_connection();
        assert_eq!(driver.recv().await, Some(TransportEvent::Reconnected));
    }

    #[tokio::test]
    async fn send_while_offline_is_dropped() {
        let mut driver = driver();
        driver.refuse_connections(true);
        driver.connect("sim://").await.unwrap();

        let message = Outbound::SendMessage(parley_proto::SendMessage { content: "x".into() });
        driver.send(message).await.unwrap();

        assert_eq!(driver.dropped(), 1);
        assert!(driver.take_sent().is_empty());
        assert!(matches!(driver.recv().await, Some(TransportEvent::ConnectError { .. })));
    }

    #[tokio::test]
    async fn poll_event_calls_app_api() {
        let mut driver = driver();
        let mut app = App::new("sim://".into());
        driver.inject_input(Input::ChangeLanguage(Language::French));

        let actions = driver.poll_event(&mut app).await.unwrap();
        assert!(actions.contains(&AppAction::ChangeLanguage { language: Language::French }));
    }
}
