//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use super::{HealthView, Invariant, InvariantResult, PhaseView, SystemSnapshot, Violation};

/// The App view model shows exactly what the controller holds.
///
/// The App never writes session state on its own; every field it shows comes
/// from a controller action. Divergence means an action was lost or invented.
pub struct ViewMatchesSession;

impl Invariant for ViewMatchesSession {
    fn name(&self) -> &'static str {
        "view_matches_session"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in state.clients.iter().filter(|c| c.active) {
            if client.app != client.controller {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: app shows {:?}, controller holds {:?}",
                        client.id, client.app, client.controller
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Identity is present exactly while the session is joining or joined.
pub struct PhaseMatchesIdentity;

impl Invariant for PhaseMatchesIdentity {
    fn name(&self) -> &'static str {
        "phase_matches_identity"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let has_identity = client.controller.identity.is_some();
            let in_session = client.phase != PhaseView::Unjoined;
            if has_identity != in_session {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: phase {:?} with identity {:?}",
                        client.id, client.phase, client.controller.identity
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Translation is reported available exactly while connected.
pub struct TranslationFollowsHealth;

impl Invariant for TranslationFollowsHealth {
    fn name(&self) -> &'static str {
        "translation_follows_health"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let connected = client.controller.health == HealthView::Connected;
            if client.controller.translation_available != connected {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: translation_available={} with health {:?}",
                        client.id, client.controller.translation_available, client.controller.health
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Once traffic settles, every joined and connected client's roster equals
/// the server's membership of its room, in server order.
///
/// Only checked on quiescent snapshots; in flight rosters may lag.
pub struct RosterConvergence;

impl Invariant for RosterConvergence {
    fn name(&self) -> &'static str {
        "roster_convergence"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        if !state.quiescent {
            return Ok(());
        }

        let settled = state.clients.iter().filter(|c| {
            c.active
                && c.online
                && c.phase == PhaseView::Joined
                && c.controller.health == HealthView::Connected
        });

        for client in settled {
            let Some(room) = client.room() else {
                continue;
            };
            let expected = state.rooms.get(room).map(Vec::as_slice).unwrap_or_default();
            if client.controller.roster != expected {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {} in #{room}: roster {:?}, server has {:?}",
                        client.id, client.controller.roster, expected
                    ),
                });
            }
        }
        Ok(())
    }
}
