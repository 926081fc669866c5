//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and handles
//! character-level key events. Command parsing happens here on Enter.

use parley_app::{App, AppAction};
use parley_client::JoinForm;

use crate::commands::{self, Command, HELP};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Input state for the TUI.
///
/// Manages the text input buffer and cursor position. The cursor counts
/// characters, not bytes.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.buffer.char_indices().nth(cursor).map_or(self.buffer.len(), |(i, _)| i)
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process (may be empty for input-only keys,
    /// or contain session actions for commands).
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
                vec![AppAction::Render]
            },
            KeyInput::Delete => {
                if self.cursor < self.char_count() {
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
                vec![AppAction::Render]
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                if self.cursor < self.char_count() {
                    self.cursor = self.cursor.saturating_add(1);
                }
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.cursor = self.char_count();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Esc => app.quit(),
        }
    }

    /// Handle Enter key - parse command and call App API.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if text.trim().is_empty() {
            return vec![AppAction::Render];
        }

        match commands::parse(&text) {
            Command::Join { name, language, room } => {
                app.join(JoinForm::new(name, Some(language), room))
            },
            Command::Language { language } => app.change_language(language),
            Command::Leave => app.leave(),
            Command::Quit => app.quit(),
            Command::Help => {
                app.set_status(HELP);
                vec![AppAction::Render]
            },
            Command::Message { content } => app.send_message(content),
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: {input}"));
                vec![AppAction::Render]
            },
            Command::InvalidArgs { command, error } => {
                app.set_status(format!("/{command}: {error}"));
                vec![AppAction::Render]
            },
        }
    }
}
