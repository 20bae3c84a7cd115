//! Scripted in-memory driver.
//!
//! [`SimDriver`] implements the full [`Driver`] seam without touching the
//! network: posts live in an in-memory store, chat frames echo straight
//! back into the inbox, and console queries dispatch against the store.
//! Tests feed it a script of [`SimCommand`]s; when the script runs dry the
//! driver quits the runtime, and a [`SimProbe`] keeps the last rendered
//! state (plus any invariant violations) for the test to inspect.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use feedline_app::{App, AppAction, AppEvent, ConnectionState, Driver};
use feedline_client::ChatEvent;
use feedline_core::{
    ChatMessage, Environment, GraphqlRequest, NewPost, Post, PostPatch, PostsPage, QueryOutcome,
    QueryRecord,
};
use serde_json::{Value, json};

use crate::{SimEnv, SimInstant, invariants};

/// One scripted user interaction.
#[derive(Debug, Clone)]
pub enum SimCommand {
    /// Type a chat message and press enter.
    SendChat(String),
    /// Change the feed search term.
    SetSearch(String),
    /// Toggle a feed category.
    ToggleCategory(String),
    /// Cycle the feed sort mode.
    CycleSort,
    /// Clear all feed filters.
    ClearFilters,
    /// Refetch the feed.
    Refresh,
    /// Create a post.
    CreatePost(NewPost),
    /// Partially update a post.
    UpdatePost {
        /// Post to update.
        id: u64,
        /// Fields to change.
        patch: PostPatch,
    },
    /// Delete a post.
    DeletePost(u64),
    /// Run a console query.
    RunQuery {
        /// Query text.
        query: String,
        /// Optional JSON variables.
        variables: Option<Value>,
    },
    /// Focus the next pane.
    NextPane,
}

/// Last rendered application state, as captured by the probe.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Ids of the visible (filtered, sorted) posts.
    pub visible_ids: Vec<u64>,
    /// Ids of the posts held by the feed page.
    pub page_ids: Vec<u64>,
    /// Ids of the visible chat messages.
    pub chat_ids: Vec<String>,
    /// Chat connection state.
    pub connection: Option<ConnectionState>,
    /// Status line.
    pub status: Option<String>,
    /// Number of console history records.
    pub history_len: usize,
    /// Latest console record outcome, true for success.
    pub last_query_ok: Option<bool>,
    /// Invariant violations observed on any render.
    pub violations: Vec<String>,
    /// Number of renders so far.
    pub renders: usize,
}

/// Shared handle onto the driver's observations; clone it before handing
/// the driver to the runtime.
#[derive(Clone, Default)]
pub struct SimProbe {
    inner: Arc<Mutex<Snapshot>>,
}

impl SimProbe {
    /// Copy the current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn observe(&self, app: &App) {
        let mut data = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        data.renders += 1;
        data.visible_ids = app.feed().visible().iter().map(|p| p.id).collect();
        data.page_ids = app.feed().posts().iter().map(|p| p.id).collect();
        data.chat_ids = app.chat().messages().iter().map(|m| m.id.clone()).collect();
        data.connection = Some(app.connection_state());
        data.status = app.status_message().map(String::from);
        data.history_len = app.history().len();
        data.last_query_ok = app.history().first().map(|r| r.outcome.is_success());

        if let Err(violations) = invariants::check_all(app) {
            data.violations.extend(violations.into_iter().map(|v| v.to_string()));
        }
    }
}

/// Fully in-memory [`Driver`] implementation.
pub struct SimDriver {
    env: SimEnv,
    probe: SimProbe,
    store: Vec<Post>,
    next_post_id: u64,
    script: VecDeque<SimCommand>,
    completions: VecDeque<AppEvent>,
    chat_inbox: VecDeque<ChatEvent>,
    /// Frames "transmitted" by the runtime, in order.
    sent: Vec<ChatMessage>,
    /// Whether transmitted frames echo back (the endpoint's behavior).
    echo: bool,
}

impl SimDriver {
    /// Create a driver over a fixture store and a command script.
    pub fn new(env: SimEnv, fixture: Vec<Post>, script: Vec<SimCommand>) -> (Self, SimProbe) {
        let probe = SimProbe::default();
        let next_post_id = fixture.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let driver = Self {
            env,
            probe: probe.clone(),
            store: fixture,
            next_post_id,
            script: script.into(),
            completions: VecDeque::new(),
            chat_inbox: VecDeque::new(),
            sent: Vec::new(),
            echo: true,
        };
        (driver, probe)
    }

    /// Disable the echo behavior (frames are transmitted into the void).
    pub fn without_echo(mut self) -> Self {
        self.echo = false;
        self
    }

    fn page(&self, limit: u32, skip: u32) -> PostsPage {
        let posts: Vec<Post> =
            self.store.iter().skip(skip as usize).take(limit as usize).cloned().collect();
        PostsPage {
            posts,
            total: self.store.len() as u64,
            skip: u64::from(skip),
            limit: u64::from(limit),
        }
    }

    fn search(&self, query: &str) -> PostsPage {
        let needle = query.to_lowercase();
        let posts: Vec<Post> = self
            .store
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle) || p.body.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        let total = posts.len() as u64;
        PostsPage { posts, total, skip: 0, limit: total }
    }

    fn apply_command(app: &mut App, command: SimCommand) -> Vec<AppAction> {
        match command {
            SimCommand::SendChat(text) => app.send_chat(text),
            SimCommand::SetSearch(term) => app.set_search_term(term),
            SimCommand::ToggleCategory(category) => app.toggle_category(&category),
            SimCommand::CycleSort => app.cycle_sort_mode(),
            SimCommand::ClearFilters => app.clear_filters(),
            SimCommand::Refresh => app.refresh(),
            SimCommand::CreatePost(post) => app.create_post(post),
            SimCommand::UpdatePost { id, patch } => app.update_post(id, patch),
            SimCommand::DeletePost(id) => app.delete_post(id),
            SimCommand::RunQuery { query, variables } => app.run_query(query, variables),
            SimCommand::NextPane => app.next_pane(),
        }
    }

    fn run_query(&mut self, query: &str, variables: Option<&Value>) -> QueryRecord {
        let data = match GraphqlRequest::parse(query, variables) {
            Ok(GraphqlRequest::ListPosts { limit, skip }) => {
                serde_json::to_value(self.page(limit, skip)).map(|page| json!({ "posts": page }))
            },
            Ok(GraphqlRequest::GetPost { id }) => {
                match self.store.iter().find(|p| p.id == id) {
                    Some(post) => {
                        serde_json::to_value(post).map(|post| json!({ "post": post }))
                    },
                    None => {
                        return self.query_record(query, variables, Err(format!(
                            "server returned 404: post {id} not found"
                        )));
                    },
                }
            },
            Ok(GraphqlRequest::SearchPosts { query: needle }) => {
                serde_json::to_value(self.search(&needle)).map(|page| json!({ "posts": page }))
            },
            Err(error) => return self.query_record(query, variables, Err(error.to_string())),
        };

        match data {
            Ok(value) => self.query_record(query, variables, Ok(value)),
            Err(error) => self.query_record(query, variables, Err(error.to_string())),
        }
    }

    fn query_record(
        &self,
        query: &str,
        variables: Option<&Value>,
        result: Result<Value, String>,
    ) -> QueryRecord {
        QueryRecord {
            id: self.env.random_id(),
            query: query.to_string(),
            variables: variables.cloned(),
            executed_at: self.env.wall_clock(),
            duration_ms: 0,
            outcome: match result {
                Ok(data) => QueryOutcome::Success { data },
                Err(message) => QueryOutcome::Error { message },
            },
        }
    }

    /// Frames transmitted so far.
    pub fn sent(&self) -> &[ChatMessage] {
        &self.sent
    }
}

impl Driver for SimDriver {
    type Error = std::convert::Infallible;
    type Instant = SimInstant;

    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl std::future::Future<Output = Result<Vec<AppAction>, Self::Error>> + Send {
        let actions = if let Some(event) = self.completions.pop_front() {
            app.handle(event)
        } else if let Some(command) = self.script.pop_front() {
            Self::apply_command(app, command)
        } else {
            // Script exhausted: end the run.
            app.quit()
        };
        std::future::ready(Ok(actions))
    }

    fn start_fetch_posts(&mut self, limit: u32, skip: u32) {
        let page = self.page(limit, skip);
        self.completions.push_back(AppEvent::PostsLoaded(page));
    }

    fn start_create_post(&mut self, post: NewPost) {
        let created = Post {
            id: self.next_post_id,
            title: post.title,
            body: post.body,
            user_id: post.user_id,
            tags: post.tags,
            reactions: post.reactions,
        };
        self.next_post_id += 1;
        self.store.insert(0, created.clone());
        self.completions.push_back(AppEvent::PostCreated(created));
    }

    fn start_update_post(&mut self, id: u64, patch: PostPatch) {
        let Some(post) = self.store.iter_mut().find(|p| p.id == id) else {
            self.completions.push_back(AppEvent::Error {
                message: format!("server returned 404: post {id} not found"),
            });
            return;
        };

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(body) = patch.body {
            post.body = body;
        }
        if let Some(user_id) = patch.user_id {
            post.user_id = user_id;
        }
        if let Some(tags) = patch.tags {
            post.tags = tags;
        }
        if let Some(reactions) = patch.reactions {
            post.reactions = reactions;
        }

        let updated = post.clone();
        self.completions.push_back(AppEvent::PostUpdated(updated));
    }

    fn start_delete_post(&mut self, id: u64) {
        let before = self.store.len();
        self.store.retain(|p| p.id != id);
        if self.store.len() == before {
            self.completions.push_back(AppEvent::Error {
                message: format!("server returned 404: post {id} not found"),
            });
        } else {
            self.completions.push_back(AppEvent::PostDeleted { id });
        }
    }

    fn start_query(&mut self, query: String, variables: Option<Value>) {
        let record = self.run_query(&query, variables.as_ref());
        self.completions.push_back(AppEvent::QueryFinished(record));
    }

    fn connect_chat(&mut self) {
        self.chat_inbox.push_back(ChatEvent::Opened);
    }

    fn send_chat(
        &mut self,
        message: ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send {
        self.sent.push(message.clone());
        if self.echo {
            self.chat_inbox.push_back(ChatEvent::Frame(message));
        }
        std::future::ready(Ok(()))
    }

    fn recv_chat(&mut self) -> impl std::future::Future<Output = Option<ChatEvent>> + Send {
        std::future::ready(self.chat_inbox.pop_front())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.probe.observe(app);
        Ok(())
    }

    fn now(&self) -> SimInstant {
        self.env.now()
    }

    fn stop(&mut self) {}
}
