//! Client configuration.

use std::time::Duration;

/// Room joined when the join form leaves the room blank.
pub const DEFAULT_ROOM: &str = "general";

/// Minimum spacing between two outgoing chat messages.
pub const DEFAULT_SEND_COOLDOWN: Duration = Duration::from_millis(500);

/// How long the "connected" banner stays up before auto-dismissing.
pub const DEFAULT_BANNER_DISMISS: Duration = Duration::from_millis(3000);

/// Tunables for the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Cooldown armed after every successful send.
    pub send_cooldown: Duration,
    /// Delay before a healthy-connection banner is dismissed.
    pub banner_dismiss: Duration,
    /// Room used when the join form leaves it blank.
    pub default_room: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            send_cooldown: DEFAULT_SEND_COOLDOWN,
            banner_dismiss: DEFAULT_BANNER_DISMISS,
            default_room: DEFAULT_ROOM.to_string(),
        }
    }
}
