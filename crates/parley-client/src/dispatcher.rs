//! Outgoing message dispatch.
//!
//! Validates chat content and applies a client-side send cooldown. The
//! cooldown is a courtesy throttle for the local user, not a security control:
//! the server must rate limit on its own if that matters.

use std::{ops::Sub, time::Duration};

use parley_proto::{Outbound, ReceivedMessage, SendMessage};

use crate::{ChatMessage, ClientError, Session, Timer};

/// Stateless apart from the cooldown timer.
#[derive(Debug, Clone)]
pub struct MessageDispatcher<I> {
    cooldown: Timer<I>,
}

impl<I> MessageDispatcher<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create a dispatcher with the given cooldown.
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown: Timer::new(cooldown) }
    }

    /// Whether the send control should be enabled.
    ///
    /// Flips to `false` on send and back to `true` once [`Self::poll`]
    /// observes the cooldown has elapsed.
    pub fn can_send(&self) -> bool {
        !self.cooldown.is_pending()
    }

    /// Prepare an outgoing message.
    ///
    /// Content is trimmed. Blank content is a silent no-op (`Ok(None)`), not
    /// an error. A successful send arms the cooldown.
    ///
    /// # Errors
    ///
    /// - `ClientError::CoolingDown` if the previous send was too recent
    pub fn send(&mut self, content: &str, now: I) -> Result<Option<Outbound>, ClientError> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        if let Some(remaining) = self.cooldown.remaining(now) {
            return Err(ClientError::CoolingDown { remaining });
        }

        self.cooldown.arm(now);
        Ok(Some(Outbound::SendMessage(SendMessage { content: content.to_string() })))
    }

    /// Expire the cooldown. Returns `true` when sending becomes possible again.
    pub fn poll(&mut self, now: I) -> bool {
        self.cooldown.poll(now)
    }

    /// Drop any pending cooldown. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.cooldown.cancel()
    }

    /// Present an inbound message. No filtering, buffering or deduplication.
    pub fn receive(&self, message: ReceivedMessage, session: &Session) -> ChatMessage {
        ChatMessage::from_wire(message, session)
    }
}
