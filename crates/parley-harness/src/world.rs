//! Multi-client simulation world.
//!
//! `SimWorld` runs several [`Runtime`]s against one shared [`SimServer`] on a
//! shared virtual clock. Every choice that would otherwise be random (which
//! link to break, what to type) comes from a seeded RNG, so a failing seed
//! reproduces exactly.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use parley_app::{Driver, Runtime};
use parley_client::{ClientConfig, Language};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::{
    ClientSnapshot, Input, InvariantRegistry, SharedSimServer, SimDriver, SimEnv, SimServer,
    SystemSnapshot,
};

/// Index of a client in the world.
pub type ClientId = usize;

const SIM_URL: &str = "sim://parley";

/// Upper bound on steps taken while waiting for traffic to settle.
pub const MAX_SETTLE_STEPS: usize = 1_000;

struct SimClient {
    runtime: Runtime<SimDriver, SimEnv>,
    finished: bool,
}

/// Fault applied by [`SimWorld::random_fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Link of the client was dropped.
    Dropped(ClientId),
    /// Link of the client was restored.
    Restored(ClientId),
    /// Nothing to do (no active clients).
    None,
}

/// Deterministic multi-client world.
pub struct SimWorld {
    seed: u64,
    rng: ChaCha8Rng,
    env: SimEnv,
    server: SharedSimServer,
    config: ClientConfig,
    clients: Vec<SimClient>,
}

impl SimWorld {
    /// Create a world with the default server and client configuration.
    pub fn new(seed: u64) -> Self {
        Self::with_server(seed, SimServer::new(), ClientConfig::default())
    }

    /// Create a world around a custom server and client configuration.
    pub fn with_server(seed: u64, server: SimServer, config: ClientConfig) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            env: SimEnv::new(),
            server: Arc::new(Mutex::new(server)),
            config,
            clients: Vec::new(),
        }
    }

    /// Seed this world was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shared virtual clock.
    pub fn env(&self) -> &SimEnv {
        &self.env
    }

    /// Shared server.
    pub fn server(&self) -> &SharedSimServer {
        &self.server
    }

    /// Number of clients ever added.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Check if no clients were added.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Start a new client. It connects immediately.
    pub async fn add_client(&mut self) -> ClientId {
        let driver = SimDriver::new(self.server.clone(), self.env.clone());
        let mut runtime =
            Runtime::new(driver, self.env.clone(), self.config.clone(), SIM_URL.to_string());

        let finished = match runtime.start().await {
            Ok(quit) => quit,
            Err(e) => {
                debug!(error = %e, "sim client failed to start");
                true
            },
        };

        self.clients.push(SimClient { runtime, finished });
        self.clients.len() - 1
    }

    /// Runtime of a client.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by [`Self::add_client`].
    pub fn client(&self, id: ClientId) -> &Runtime<SimDriver, SimEnv> {
        &self.clients[id].runtime
    }

    /// Whether the client's runtime has quit.
    pub fn is_finished(&self, id: ClientId) -> bool {
        self.clients.get(id).is_none_or(|c| c.finished)
    }

    /// Queue user input for a client.
    pub fn input(&self, id: ClientId, input: Input) {
        if let Some(client) = self.clients.get(id) {
            client.runtime.driver().inject_input(input);
        }
    }

    /// Run one event-loop cycle for every running client.
    pub async fn step(&mut self) {
        for (id, client) in self.clients.iter_mut().enumerate() {
            if client.finished {
                continue;
            }

            let quit = match client.runtime.process_cycle().await {
                Ok(quit) => quit,
                Err(e) => {
                    debug!(client = id, error = %e, "sim client failed");
                    true
                },
            };

            if quit {
                trace!(client = id, "sim client quit");
                client.runtime.driver_mut().stop();
                client.finished = true;
            }
        }
    }

    /// No running client has input or traffic waiting.
    pub fn is_quiescent(&self) -> bool {
        self.clients.iter().filter(|c| !c.finished).all(|c| !c.runtime.driver().has_pending())
    }

    /// Step until quiescent. Returns the number of steps taken, or `None` if
    /// traffic did not settle within [`MAX_SETTLE_STEPS`].
    pub async fn run_until_quiescent(&mut self) -> Option<usize> {
        for steps in 0..MAX_SETTLE_STEPS {
            if self.is_quiescent() {
                return Some(steps);
            }
            self.step().await;
        }
        self.is_quiescent().then_some(MAX_SETTLE_STEPS)
    }

    /// Move virtual time forward and run one cycle so timers fire.
    pub async fn advance(&mut self, by: Duration) {
        self.env.advance(by);
        self.step().await;
    }

    /// Break a connected client's link or restore a broken one, chosen by the
    /// world RNG.
    pub fn random_fault(&mut self) -> Fault {
        let Some(id) = self.random_client() else {
            return Fault::None;
        };

        let driver = self.clients[id].runtime.driver();
        if driver.is_online() {
            driver.drop_connection();
            Fault::Dropped(id)
        } else {
            driver.restore_connection();
            Fault::Restored(id)
        }
    }

    /// Restore every broken link.
    pub fn heal(&self) {
        for client in self.clients.iter().filter(|c| !c.finished) {
            client.runtime.driver().restore_connection();
        }
    }

    /// Random chat input for a client: mostly messages, sometimes a language
    /// change.
    pub fn random_input(&mut self) -> Input {
        if self.rng.gen_bool(0.2) {
            let language = Language::ALL[self.rng.gen_range(0..Language::ALL.len())];
            Input::ChangeLanguage(language)
        } else {
            Input::Send(format!("msg-{}", self.rng.gen_range(0..10_000u32)))
        }
    }

    /// Pick a running client with the world RNG.
    pub fn random_client(&mut self) -> Option<ClientId> {
        let running: Vec<_> = (0..self.clients.len()).filter(|id| !self.is_finished(*id)).collect();
        if running.is_empty() {
            None
        } else {
            Some(running[self.rng.gen_range(0..running.len())])
        }
    }

    /// Capture the observable state of every client and the server.
    pub fn snapshot(&self) -> SystemSnapshot {
        let rooms = self.server.lock().unwrap_or_else(PoisonError::into_inner).rooms();
        let mut snapshot =
            SystemSnapshot { rooms, quiescent: self.is_quiescent(), ..SystemSnapshot::default() };

        for (id, client) in self.clients.iter().enumerate() {
            let runtime = &client.runtime;
            let mut captured =
                ClientSnapshot::capture(id, runtime.app(), runtime.bridge().controller());
            captured.active = !client.finished;
            captured.online = runtime.driver().is_online();
            snapshot.add_client(captured);
        }
        snapshot
    }

    /// Assert every invariant in `registry` against the current state.
    pub fn check_invariants(&self, registry: &InvariantRegistry, context: &str) {
        let context = format!("{context} (seed {})", self.seed);
        registry.assert_all(&self.snapshot(), &context);
    }
}
