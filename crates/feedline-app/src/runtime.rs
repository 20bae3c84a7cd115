//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: chat session bridge
//! - [`Driver`]: platform-specific I/O

use feedline_core::Environment;

use crate::{App, AppAction, AppEvent, Bridge, Driver};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: platform-specific I/O driver
/// - `E`: environment supplying time and randomness
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
    pub fn new(driver: D, env: E, username: impl Into<String>, page_limit: u32) -> Self {
        let app = App::new(page_limit);
        let bridge = Bridge::new(env, username);
        Self { driver, app, bridge }
    }

    /// Run the main event loop.
    ///
    /// 1. Renders the initial state and executes the bootstrap actions
    ///    (feed fetch, chat connect).
    /// 2. Polls the driver for input and completion events.
    /// 3. Drains transport events through the bridge.
    /// 4. Executes resulting actions, sending outgoing messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let actions = self.app.bootstrap();
        if self.process_actions(actions).await? {
            self.driver.stop();
            return Ok(());
        }

        loop {
            if self.process_cycle().await? {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        let actions = self.driver.poll_event(&mut self.app).await?;
        if !actions.is_empty() && self.process_actions(actions).await? {
            return Ok(true);
        }

        while let Some(event) = self.driver.recv_chat().await {
            let events = self.bridge.handle_transport_event(event);
            if self.process_bridge_events(events).await? {
                return Ok(true);
            }
        }

        let events = self.bridge.handle_tick();
        if self.process_bridge_events(events).await? {
            return Ok(true);
        }

        Ok(false)
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

                    AppAction::FetchPosts { limit, skip } => {
                        self.driver.start_fetch_posts(limit, skip);
                    },
                    AppAction::CreatePost(post) => self.driver.start_create_post(post),
                    AppAction::UpdatePost { id, patch } => {
                        self.driver.start_update_post(id, patch);
                    },
                    AppAction::DeletePost { id } => self.driver.start_delete_post(id),
                    AppAction::RunQuery { query, variables } => {
                        self.driver.start_query(query, variables);
                    },

                    AppAction::ConnectChat => {
                        self.bridge.start_connection();
                        self.driver.connect_chat();
                        pending_actions.extend(self.app.handle(AppEvent::ChatConnecting));
                    },

                    AppAction::SendChat { text } => {
                        let events = self.bridge.send_chat(&text);
                        self.send_outgoing().await?;
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                }
            }
        }

        Ok(false)
    }

    /// Process events from the Bridge back through the App.
    async fn process_bridge_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Send all pending outgoing chat messages through the driver.
    async fn send_outgoing(&mut self) -> Result<(), D::Error> {
        for message in self.bridge.take_outgoing() {
            self.driver.send_chat(message).await?;
        }
        Ok(())
    }

    /// Get a reference to the App.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Bridge.
    pub fn bridge(&self) -> &Bridge<E> {
        &self.bridge
    }
}
