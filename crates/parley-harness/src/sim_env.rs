//! Virtual-time environment.
//!
//! `SimEnv` implements [`Environment`] with a clock that only moves when a test
//! advances it. Instants are offsets from the start of the simulation, so
//! every run with the same inputs sees the same timestamps.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use parley_client::Environment;

/// Manually advanced clock shared by every clone.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    elapsed: Arc<Mutex<Duration>>,
}

impl SimEnv {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward and return the new time.
    pub fn advance(&self, by: Duration) -> Duration {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        *elapsed = elapsed.saturating_add(by);
        *elapsed
    }
}

impl Environment for SimEnv {
    type Instant = Duration;

    fn now(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
