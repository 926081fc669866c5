//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use parley_client::{Outbound, TransportEvent};

use crate::{App, AppAction};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal and in simulation.
///
/// # Implementations
///
/// - **Terminal**: crossterm for input, ratatui for output, WebSocket transport
/// - **Simulation**: Scripted input against an in-memory server
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
/// - [`Instant`](Driver::Instant): Time representation (real or virtual)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Poll for the next user input and turn it into actions.
    ///
    /// Returns an empty list if nothing happened before the poll interval
    /// elapsed.
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Hand a request to the transport.
    ///
    /// Requests sent while the transport is down are dropped, not queued.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport channel is gone.
    fn send(&mut self, outbound: Outbound) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Next transport event, if one is ready. Never blocks.
    fn recv(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;

    /// Open the transport channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be created. Failing to reach the
    /// server is not an error; it is reported as a transport event.
    fn connect(&mut self, url: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Close the transport channel.
    fn disconnect(&mut self);

    /// Check if a transport channel is open.
    fn is_connected(&self) -> bool;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Stop the connection and clean up resources.
    fn stop(&mut self);
}
