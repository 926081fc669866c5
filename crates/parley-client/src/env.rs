//! Environment abstraction for deterministic testing.
//!
//! Decouples session logic from the wall clock. Production uses
//! [`SystemEnv`]; simulation supplies a manually advanced clock so cooldown
//! and banner timers can be exercised without sleeping.

use std::{fmt::Debug, ops::Sub, time::Duration};

/// Source of monotonic time.
///
/// # Invariants
///
/// - `now()` never goes backwards within a single execution context.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production uses `std::time::Instant`; simulation may use virtual time.
    type Instant: Copy + Ord + Debug + Send + Sync + Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;
}

/// Environment backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }
}
