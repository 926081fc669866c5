//! Application layer for Parley
//!
//! Pure state machines and generic runtime for UI and session orchestration,
//! enabling deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`App`]: view model (transcript, roster, identity, connection status)
//! - [`Bridge`]: session bridge (translates App actions to controller events)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::Runtime;
pub use state::{Entry, Transcript};
