//! WebSocket transport for the client.
//!
//! Provides [`ConnectedClient`], an auto-reconnecting channel that carries
//! [`Outbound`] requests up and reports [`TransportEvent`]s down. This is a
//! thin layer: it encodes and decodes frames and reports lifecycle changes,
//! while session logic stays in the Sans-IO [`SessionController`].
//!
//! Frames handed to the channel while it is offline are dropped, not queued.
//! The controller re-sends the join on reconnect, which is the only state the
//! server needs back.
//!
//! [`SessionController`]: crate::SessionController

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use parley_proto::{Inbound, Outbound, ProtocolError};
use rand::Rng;
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::TransportEvent;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Channel capacity in each direction.
const CHANNEL_CAPACITY: usize = 64;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Stream error.
    #[error("stream error: {0}")]
    Stream(String),

    /// Frame could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Reconnection backoff policy.
///
/// Delays grow exponentially from `initial_delay`, capped at `max_delay`, and
/// are spread by `randomization` (0.0 disables jitter, 1.0 allows up to the
/// full base delay either way).
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectConfig {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Jitter factor in `[0.0, 1.0]`.
    pub randomization: f64,
    /// Give up after this many consecutive failures. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            randomization: 0.5,
            max_attempts: None,
        }
    }
}

impl ReconnectConfig {
    /// Un-jittered delay before retry number `attempt` (zero-based).
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }

    fn jittered_delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        let spread = base.as_secs_f64() * self.randomization.clamp(0.0, 1.0);
        if spread <= 0.0 {
            return base;
        }

        let offset = rand::thread_rng().gen_range(-spread..=spread);
        Duration::from_secs_f64((base.as_secs_f64() + offset).max(0.0)).min(self.max_delay)
    }

    fn exhausted(&self, failures: u32) -> bool {
        self.max_attempts.is_some_and(|max| failures >= max)
    }
}

/// Handle to an auto-reconnecting WebSocket channel.
///
/// Requests go in via `to_server`, lifecycle and inbound events come out of
/// `from_server`. Dropping `to_server` closes the socket and ends the task.
pub struct ConnectedClient {
    /// Send requests to the server.
    pub to_server: mpsc::Sender<Outbound>,
    /// Receive lifecycle and inbound events.
    pub from_server: mpsc::Receiver<TransportEvent>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedClient {
    /// Stop the connection.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Open a channel to a Parley server.
///
/// Returns immediately; the first event on `from_server` is either
/// [`TransportEvent::Connected`] or [`TransportEvent::ConnectError`]. Must be
/// called from within a Tokio runtime.
pub fn connect(url: impl Into<String>, config: ReconnectConfig) -> ConnectedClient {
    let (to_server_tx, to_server_rx) = mpsc::channel::<Outbound>(CHANNEL_CAPACITY);
    let (from_server_tx, from_server_rx) = mpsc::channel::<TransportEvent>(CHANNEL_CAPACITY);

    let handle = tokio::spawn(run_channel(url.into(), config, to_server_rx, from_server_tx));

    ConnectedClient {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    }
}

/// Why a live connection ended.
enum PumpExit {
    /// Socket dropped; reconnect.
    Dropped(String),
    /// Caller went away; stop for good.
    Shutdown,
}

/// Connect, pump, and reconnect until the caller hangs up.
async fn run_channel(
    url: String,
    config: ReconnectConfig,
    mut to_server: mpsc::Receiver<Outbound>,
    from_server: mpsc::Sender<TransportEvent>,
) {
    let mut connected_before = false;
    let mut failures: u32 = 0;

    loop {
        let event = match tokio_tungstenite::connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                failures = 0;
                drop_queued(&mut to_server);

                info!(%url, reconnect = connected_before, "transport connected");
                let lifecycle = if connected_before {
                    TransportEvent::Reconnected
                } else {
                    TransportEvent::Connected
                };
                connected_before = true;
                if from_server.send(lifecycle).await.is_err() {
                    return;
                }

                match pump(stream, &mut to_server, &from_server).await {
                    PumpExit::Dropped(reason) => {
                        info!(%reason, "transport dropped");
                        TransportEvent::Disconnected { reason }
                    },
                    PumpExit::Shutdown => return,
                }
            },
            Err(e) => {
                let error = TransportError::Connection(e.to_string());
                failures = failures.saturating_add(1);
                warn!(%error, failures, "transport connect failed");
                TransportEvent::ConnectError { reason: error.to_string() }
            },
        };

        if from_server.send(event).await.is_err() {
            return;
        }

        if config.exhausted(failures) {
            warn!(failures, "giving up on reconnection");
            return;
        }

        let delay = config.jittered_delay(failures.saturating_sub(1));
        debug!(?delay, "waiting before reconnect");
        if !wait_offline(delay, &mut to_server).await {
            return;
        }
    }
}

/// Bridge one live socket to the channels.
async fn pump(
    stream: WsStream,
    to_server: &mut mpsc::Receiver<Outbound>,
    from_server: &mpsc::Sender<TransportEvent>,
) -> PumpExit {
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            outbound = to_server.recv() => {
                let Some(outbound) = outbound else {
                    let _ = write.send(Message::Close(None)).await;
                    return PumpExit::Shutdown;
                };

                let text = match outbound.encode() {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %TransportError::from(e), "dropping unencodable request");
                        continue;
                    },
                };

                debug!(event = outbound.name(), "sending");
                if let Err(e) = write.send(Message::text(text)).await {
                    return PumpExit::Dropped(TransportError::Stream(e.to_string()).to_string());
                }
            },
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => match Inbound::decode(text.as_str()) {
                    Ok(inbound) => {
                        debug!(event = inbound.name(), "received");
                        if from_server.send(TransportEvent::Received(inbound)).await.is_err() {
                            return PumpExit::Shutdown;
                        }
                    },
                    Err(e) => warn!(error = %TransportError::from(e), "dropping undecodable frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| f.reason.as_str().to_string())
                        .filter(|reason| !reason.is_empty())
                        .unwrap_or_else(|| "closed by server".to_string());
                    return PumpExit::Dropped(reason);
                },
                // Ping/Pong handled by tungstenite
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    return PumpExit::Dropped(TransportError::Stream(e.to_string()).to_string());
                },
                None => return PumpExit::Dropped("stream ended".to_string()),
            },
        }
    }
}

/// Discard anything the caller sent while we were offline.
fn drop_queued(to_server: &mut mpsc::Receiver<Outbound>) {
    while let Ok(outbound) = to_server.try_recv() {
        debug!(event = outbound.name(), "dropping request sent while offline");
    }
}

/// Sleep out the backoff, dropping requests as they arrive.
///
/// Returns `false` if the caller hung up.
async fn wait_offline(delay: Duration, to_server: &mut mpsc::Receiver<Outbound>) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            () = &mut sleep => return true,
            outbound = to_server.recv() => match outbound {
                Some(outbound) => {
                    debug!(event = outbound.name(), "dropping request sent while offline");
                },
                None => return false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_up_to_cap() {
        let config = ReconnectConfig::default();
        assert_eq!(config.base_delay(0), Duration::from_secs(1));
        assert_eq!(config.base_delay(1), Duration::from_secs(2));
        assert_eq!(config.base_delay(2), Duration::from_secs(4));
        assert_eq!(config.base_delay(3), Duration::from_secs(5));
        assert_eq!(config.base_delay(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn jitter_stays_in_bounds() {
        let config = ReconnectConfig::default();
        for attempt in 0..8 {
            let base = config.base_delay(attempt);
            let delay = config.jittered_delay(attempt);
            assert!(delay <= config.max_delay);
            assert!(delay >= base.mul_f64(0.5).saturating_sub(Duration::from_millis(1)));
        }
    }

    #[test]
    fn zero_randomization_is_deterministic() {
        let config = ReconnectConfig { randomization: 0.0, ..ReconnectConfig::default() };
        assert_eq!(config.jittered_delay(1), Duration::from_secs(2));
    }

    #[test]
    fn max_attempts_bounds_retries() {
        let config = ReconnectConfig { max_attempts: Some(3), ..ReconnectConfig::default() };
        assert!(!config.exhausted(2));
        assert!(config.exhausted(3));
        assert!(!ReconnectConfig::default().exhausted(u32::MAX));
    }
}
