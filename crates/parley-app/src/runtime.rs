//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Session bridge to the controller
//! - [`Driver`]: Platform-specific I/O

use parley_client::{ClientConfig, Environment};

use crate::{App, AppAction, AppEvent, Bridge, Driver};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing time to the session controller
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    app: App,
    bridge: Bridge<E>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
{
    /// Create a new runtime with the given driver and environment.
    pub fn new(driver: D, env: E, config: ClientConfig, url: String) -> Self {
        let app = App::new(url);
        let bridge = Bridge::new(env, config);
        Self { driver, app, bridge }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for input from the driver
    /// 2. Drains transport events into the bridge
    /// 3. Ticks the bridge so timers fire
    /// 4. Sends outgoing requests through the driver
    ///
    /// Returns after the user quits or leaves the room.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let mut should_quit = self.start().await?;

        while !should_quit {
            should_quit = self.process_cycle().await?;
        }

        self.driver.stop();
        Ok(())
    }

    /// Render once and open the transport.
    ///
    /// Returns `true` if the application should quit.
    pub async fn start(&mut self) -> Result<bool, D::Error> {
        self.driver.render(&self.app)?;
        let actions = self.app.connect();
        self.process_actions(actions).await
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    pub async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        let actions = self.driver.poll_event(&mut self.app).await?;
        if !actions.is_empty() && self.process_actions(actions).await? {
            return Ok(true);
        }

        while self.driver.is_connected() {
            let Some(event) = self.driver.recv().await else {
                break;
            };
            let events = self.bridge.handle_transport(event);
            if self.process_bridge_events(events).await? {
                return Ok(true);
            }
        }

        let now = self.driver.now();
        let events = self.bridge.handle_tick(now);
        self.process_bridge_events(events).await
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Connect { url } => {
                        tracing::info!(%url, "connecting");
                        self.driver.connect(&url).await?;
                    },

                    // Session operations go through the bridge
                    AppAction::Join(_)
                    | AppAction::SendMessage { .. }
                    | AppAction::ChangeLanguage { .. }
                    | AppAction::Leave => {
                        let events = self.bridge.process_app_action(action);
                        self.flush_bridge().await?;
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Process events from Bridge back to App.
    async fn process_bridge_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        self.flush_bridge().await?;
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Send pending requests and honour a teardown request.
    async fn flush_bridge(&mut self) -> Result<(), D::Error> {
        for outbound in self.bridge.take_outgoing() {
            self.driver.send(outbound).await?;
        }
        if self.bridge.take_disconnect() {
            tracing::info!("closing transport");
            self.driver.disconnect();
        }
        Ok(())
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Bridge
    pub fn bridge(&self) -> &Bridge<E> {
        &self.bridge
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
