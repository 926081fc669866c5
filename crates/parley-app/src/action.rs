//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use parley_client::{JoinForm, Language};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Open the transport channel.
    Connect {
        /// Server URL.
        url: String,
    },

    /// Submit the join form.
    Join(JoinForm),

    /// Send a chat message.
    SendMessage {
        /// Message text, untrimmed.
        content: String,
    },

    /// Switch display language.
    ChangeLanguage {
        /// Requested language.
        language: Language,
    },

    /// Leave the room and tear down the connection.
    Leave,
}
