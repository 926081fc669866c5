//! Client
//!
//! Sans-IO session layer for the Parley chat protocol. Tracks who we are in
//! the conversation, drives join, rejoin-after-reconnect, language change and
//! leave, throttles outgoing messages, and reduces roster snapshots.
//!
//! # Architecture
//!
//! Everything is driven through [`SessionController::handle`]: the caller
//! feeds a [`ClientEvent`] (transport lifecycle, inbound frame, user intent or
//! timer tick) and executes the returned [`ClientAction`]s. No I/O happens in
//! here, so the whole transition table is testable with a virtual clock.
//!
//! # Components
//!
//! - [`SessionController`]: the state machine and sole writer of [`Session`]
//! - [`MessageDispatcher`]: outgoing message validation and send cooldown
//! - [`PresenceTracker`]: ordered roster, replaced wholesale on every update
//! - [`StatusIndicator`]: connection health, banner and translation status
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::connect`]: auto-reconnecting WebSocket channel
//! - [`transport::ConnectedClient`]: handle for sending and receiving

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod controller;
mod dispatcher;
pub mod env;
mod error;
mod event;
mod message;
mod presence;
mod session;
mod status;
mod timer;

#[cfg(feature = "transport")]
pub mod transport;

pub use config::{ClientConfig, DEFAULT_BANNER_DISMISS, DEFAULT_ROOM, DEFAULT_SEND_COOLDOWN};
pub use controller::SessionController;
pub use dispatcher::MessageDispatcher;
pub use env::{Environment, SystemEnv};
pub use error::{ClientError, ValidationError};
pub use event::{ClientAction, ClientEvent, JoinForm, Notice, NoticeKind, TransportEvent};
pub use message::ChatMessage;
pub use parley_proto::{Inbound, Language, Outbound};
pub use presence::PresenceTracker;
pub use session::{Identity, Session, SessionPhase};
pub use status::{Banner, ConnectionHealth, StatusIndicator};
pub use timer::Timer;
