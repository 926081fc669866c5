//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Network uses the WebSocket
//! transport from `parley-client`.

use std::{
    io::{self, Stdout, stdout},
    time::Instant,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use parley_app::{App, AppAction, AppEvent, Driver};
use parley_client::{
    JoinForm, Outbound, TransportEvent,
    transport::{self, ConnectedClient, ReconnectConfig},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::{InputState, KeyInput, ui};

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The transport task is gone.
    #[error("channel send error")]
    ChannelSend,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and the WebSocket
/// channel. Owns the input state for text editing.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    connection: Option<ConnectedClient>,
    reconnect: ReconnectConfig,
    input_state: InputState,
    /// Join form from the command line, submitted on the first poll.
    pending_join: Option<JoinForm>,
}

impl TerminalDriver {
    /// Create a new terminal driver and take over the screen.
    pub fn new(reconnect: ReconnectConfig) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self {
            terminal,
            event_stream,
            connection: None,
            reconnect,
            input_state: InputState::new(),
            pending_join: None,
        })
    }

    /// Submit `form` as soon as the runtime starts polling.
    pub fn join_on_start(&mut self, form: JoinForm) {
        self.pending_join = Some(form);
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        if let Some(form) = self.pending_join.take() {
            return Ok(app.join(form));
        }

        let timeout = tokio::time::Duration::from_millis(100);

        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        match Self::convert_key(key_event.code) {
                            Some(key_input) => Ok(self.input_state.handle_key(key_input, app)),
                            None => Ok(vec![]),
                        }
                    },
                    Some(Ok(Event::Resize(..))) => Ok(vec![AppAction::Render]),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(vec![]),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(timeout) => {
                Ok(app.handle(AppEvent::Tick))
            }
        }
    }

    async fn send(&mut self, outbound: Outbound) -> Result<(), Self::Error> {
        if let Some(conn) = &self.connection {
            conn.to_server.send(outbound).await.map_err(|_| TerminalError::ChannelSend)?;
        }
        Ok(())
    }

    async fn recv(&mut self) -> Option<TransportEvent> {
        self.connection.as_mut().and_then(|conn| conn.from_server.try_recv().ok())
    }

    async fn connect(&mut self, url: &str) -> Result<(), Self::Error> {
        self.connection = Some(transport::connect(url, self.reconnect.clone()));
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.stop();
        }
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.input_state);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        self.disconnect();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
