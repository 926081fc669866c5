//! One-shot timers owned by the component that arms them.
//!
//! A timer never fires by itself. Its owner polls it with the current time,
//! and cancelling simply disarms it, so teardown is deterministic and needs
//! no runtime support.

use std::{ops::Sub, time::Duration};

/// One-shot timer with a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct Timer<I> {
    duration: Duration,
    armed_at: Option<I>,
}

impl<I> Timer<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create a disarmed timer.
    pub fn new(duration: Duration) -> Self {
        Self { duration, armed_at: None }
    }

    /// Arm (or re-arm) the timer starting at `now`.
    pub fn arm(&mut self, now: I) {
        self.armed_at = Some(now);
    }

    /// Disarm the timer. Returns `true` if it was pending.
    pub fn cancel(&mut self) -> bool {
        self.armed_at.take().is_some()
    }

    /// Timer is armed and has not been polled past its deadline.
    pub fn is_pending(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Time left before expiry. `None` if disarmed or already expired.
    pub fn remaining(&self, now: I) -> Option<Duration> {
        let elapsed = elapsed(self.armed_at?, now);
        (elapsed < self.duration).then(|| self.duration - elapsed)
    }

    /// Fire the timer if its deadline has passed.
    ///
    /// Returns `true` exactly once per arming.
    pub fn poll(&mut self, now: I) -> bool {
        match self.armed_at {
            Some(armed_at) if elapsed(armed_at, now) >= self.duration => {
                self.armed_at = None;
                true
            },
            _ => false,
        }
    }
}

/// Time since `armed_at`. A `now` from before the arming counts as zero.
fn elapsed<I>(armed_at: I, now: I) -> Duration
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    if now > armed_at { now - armed_at } else { Duration::ZERO }
}
