//! Connection health and translation availability.
//!
//! Both signals are derived purely from transport lifecycle events. The
//! protocol carries no translation-health event, so translation is assumed
//! available whenever the transport is connected.
//!
//! # Banner
//!
//! ```text
//! Connected / Reconnected ──> banner shown, dismissed after `banner_dismiss`
//! Disconnected / ConnectError ──> banner shown until the next connect
//! ```

use std::{ops::Sub, time::Duration};

use crate::{ClientAction, Timer};

const CONNECTED_TEXT: &str = "Connected!";
const RECONNECTED_TEXT: &str = "Reconnected!";
const DISCONNECTED_TEXT: &str = "Connection lost. Reconnecting...";
const CONNECT_FAILED_TEXT: &str = "Connection failed. Please check if the server is running.";

/// Derived connection health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionHealth {
    /// No lifecycle event seen yet.
    #[default]
    Connecting,
    /// Transport is up.
    Connected,
    /// Transport is down; it reconnects on its own.
    Disconnected,
}

/// Status banner content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Text to show.
    pub text: String,
    /// Health the banner reports.
    pub health: ConnectionHealth,
}

impl Banner {
    fn new(text: &str, health: ConnectionHealth) -> Self {
        Self { text: text.to_string(), health }
    }

    /// Healthy banners go away on their own; failure banners persist.
    pub fn auto_dismisses(&self) -> bool {
        self.health == ConnectionHealth::Connected
    }
}

/// Tracks health, banner and translation availability.
#[derive(Debug, Clone)]
pub struct StatusIndicator<I> {
    health: ConnectionHealth,
    translation_available: bool,
    banner: Option<Banner>,
    dismiss: Timer<I>,
}

impl<I> StatusIndicator<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create an indicator in the `Connecting` state.
    pub fn new(banner_dismiss: Duration) -> Self {
        Self {
            health: ConnectionHealth::Connecting,
            translation_available: false,
            banner: None,
            dismiss: Timer::new(banner_dismiss),
        }
    }

    /// Current connection health.
    pub fn health(&self) -> ConnectionHealth {
        self.health
    }

    /// Transport is connected.
    pub fn is_online(&self) -> bool {
        self.health == ConnectionHealth::Connected
    }

    /// Translation service is assumed reachable.
    pub fn translation_available(&self) -> bool {
        self.translation_available
    }

    /// Banner currently shown.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Transport connected (first time or after a drop).
    pub fn on_connected(&mut self, now: I, reconnected: bool) -> Vec<ClientAction> {
        let text = if reconnected { RECONNECTED_TEXT } else { CONNECTED_TEXT };
        let actions = self.transition(ConnectionHealth::Connected, text);
        self.dismiss.arm(now);
        actions
    }

    /// Established connection dropped.
    pub fn on_disconnected(&mut self) -> Vec<ClientAction> {
        self.dismiss.cancel();
        self.transition(ConnectionHealth::Disconnected, DISCONNECTED_TEXT)
    }

    /// Connection attempt failed.
    pub fn on_connect_error(&mut self) -> Vec<ClientAction> {
        self.dismiss.cancel();
        self.transition(ConnectionHealth::Disconnected, CONNECT_FAILED_TEXT)
    }

    /// Auto-dismiss the healthy banner once its timer expires.
    pub fn poll(&mut self, now: I) -> Option<ClientAction> {
        if self.dismiss.poll(now) && self.banner.take().is_some() {
            Some(ClientAction::DismissBanner)
        } else {
            None
        }
    }

    /// Transport torn down by leave: no banner, nothing pending.
    pub fn teardown(&mut self) -> Vec<ClientAction> {
        self.dismiss.cancel();
        let mut actions = self.set_health(ConnectionHealth::Disconnected);
        if self.banner.take().is_some() {
            actions.push(ClientAction::DismissBanner);
        }
        actions
    }

    fn transition(&mut self, health: ConnectionHealth, text: &str) -> Vec<ClientAction> {
        let mut actions = self.set_health(health);
        let banner = Banner::new(text, health);
        if self.banner.as_ref() != Some(&banner) {
            self.banner = Some(banner.clone());
            actions.push(ClientAction::ShowBanner(banner));
        }
        actions
    }

    fn set_health(&mut self, health: ConnectionHealth) -> Vec<ClientAction> {
        let mut actions = Vec::new();
        if self.health != health {
            self.health = health;
            actions.push(ClientAction::HealthChanged(health));
        }

        let translation_available = health == ConnectionHealth::Connected;
        if self.translation_available != translation_available {
            self.translation_available = translation_available;
            actions.push(ClientAction::TranslationAvailability(translation_available));
        }
        actions
    }
}
