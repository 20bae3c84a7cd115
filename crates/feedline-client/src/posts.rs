//! Typed posts API.
//!
//! The full CRUD-and-search surface of the posts endpoint, one method per
//! operation. Responses decode straight into the `feedline-core` wire
//! types.

use feedline_core::{NewPost, Post, PostPatch, PostsPage};

use crate::{error::ApiError, http::RestClient};

/// Posts endpoint client.
#[derive(Debug, Clone)]
pub struct PostsApi {
    client: RestClient,
}

impl PostsApi {
    /// Wrap a [`RestClient`].
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Fetch one page of posts.
    pub async fn list(&self, limit: u32, skip: u32) -> Result<PostsPage, ApiError> {
        self.client
            .get("/posts", &[("limit", limit.to_string()), ("skip", skip.to_string())])
            .await
    }

    /// Fetch a single post by id.
    pub async fn get(&self, id: u64) -> Result<Post, ApiError> {
        self.client.get(&format!("/posts/{id}"), &[]).await
    }

    /// Create a post. The server assigns the id.
    pub async fn create(&self, post: &NewPost) -> Result<Post, ApiError> {
        self.client.post("/posts/add", post).await
    }

    /// Partially update a post; absent patch fields are left untouched.
    pub async fn update(&self, id: u64, patch: &PostPatch) -> Result<Post, ApiError> {
        self.client.put(&format!("/posts/{id}"), patch).await
    }

    /// Delete a post.
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/posts/{id}")).await
    }

    /// Full-text search over posts.
    pub async fn search(&self, query: &str) -> Result<PostsPage, ApiError> {
        self.client.get("/posts/search", &[("q", query.to_string())]).await
    }
}
