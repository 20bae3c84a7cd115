//! Query console execution.
//!
//! Parses console input into a [`GraphqlRequest`], dispatches it to the
//! equivalent REST call, shapes the response the way the console expects,
//! and records every execution (success or failure) in an explicitly
//! owned, capacity-bounded [`QueryHistory`].

use feedline_core::{Environment, GraphqlRequest, QueryHistory, QueryOutcome, QueryRecord};
use serde_json::{Value, json};

use crate::{error::ApiError, posts::PostsApi};

/// Console client with its own query history.
///
/// The history is injected at construction and owned here; components that
/// display it borrow it through [`GraphqlClient::history`].
pub struct GraphqlClient<E: Environment> {
    env: E,
    posts: PostsApi,
    history: QueryHistory,
}

impl<E: Environment> GraphqlClient<E> {
    /// Create a console client over the given posts API.
    pub fn new(env: E, posts: PostsApi, history: QueryHistory) -> Self {
        Self { env, posts, history }
    }

    /// Executed queries, newest first.
    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    /// Drop all history records.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Remove one history record by id.
    pub fn remove_record(&mut self, id: &str) -> bool {
        self.history.remove(id)
    }

    /// Execute a console query.
    ///
    /// Both outcomes are recorded in history with their wall time before
    /// the result is returned, so the history always reflects what the
    /// user just ran.
    pub async fn execute(
        &mut self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Value, ApiError> {
        let started = self.env.now();
        let executed_at = self.env.wall_clock();

        let result = self.dispatch(query, variables.as_ref()).await;

        let duration = self.env.now() - started;
        let outcome = match &result {
            Ok(data) => QueryOutcome::Success { data: data.clone() },
            Err(error) => QueryOutcome::Error { message: error.to_string() },
        };

        self.history.record(QueryRecord {
            id: self.env.random_id(),
            query: query.to_string(),
            variables,
            executed_at,
            duration_ms: duration.as_millis() as u64,
            outcome,
        });

        result
    }

    async fn dispatch(&self, query: &str, variables: Option<&Value>) -> Result<Value, ApiError> {
        match GraphqlRequest::parse(query, variables)? {
            GraphqlRequest::ListPosts { limit, skip } => {
                let page = self.posts.list(limit, skip).await?;
                Ok(json!({ "posts": serde_json::to_value(page)? }))
            },
            GraphqlRequest::GetPost { id } => {
                let post = self.posts.get(id).await?;
                Ok(json!({ "post": serde_json::to_value(post)? }))
            },
            GraphqlRequest::SearchPosts { query } => {
                let page = self.posts.search(&query).await?;
                Ok(json!({ "posts": serde_json::to_value(page)? }))
            },
        }
    }
}
