//! Deterministic simulation harness for the Parley session layer.
//!
//! Virtual-time implementations of the Environment and Driver traits, plus an
//! in-memory room server, so whole multi-client sessions run reproducibly
//! from a seed with no sockets and no sleeps.
//!
//! # World
//!
//! [`SimWorld`] runs several [`parley_app::Runtime`]s against a shared
//! [`SimServer`]. Faults (dropped and restored links, refused connections)
//! are injected through [`SimDriver`].
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the common
//! session invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_env;
pub mod sim_server;
pub mod translator;
pub mod world;

pub use invariants::{
    ClientSnapshot, HealthView, IdentityView, Invariant, InvariantRegistry, InvariantResult,
    PhaseMatchesIdentity, PhaseView, RosterConvergence, SessionView, SystemSnapshot,
    TranslationFollowsHealth, ViewMatchesSession, Violation,
};
pub use sim_driver::{Input, SimDriver, SimDriverError};
pub use sim_env::SimEnv;
pub use sim_server::{ConnId, HISTORY_REPLAY, SharedSimServer, SimServer, create_shared_server};
pub use translator::{TaggingTranslator, Translator, UnavailableTranslator};
pub use world::{ClientId, Fault, MAX_SETTLE_STEPS, SimWorld};
