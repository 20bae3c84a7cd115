//! Post data model.
//!
//! JSON wire shapes for the remote posts API. Field names are camelCase on
//! the wire (`userId`); `tags` and `reactions` may be absent in responses
//! and default to empty/zeroed, which is also what the query engine assumes
//! when sorting by likes.

use serde::{Deserialize, Serialize};

/// Reaction counters attached to a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReactions {
    /// Number of likes.
    pub likes: u64,
    /// Number of dislikes.
    pub dislikes: u64,
}

/// A blog post as served by the remote API.
///
/// Immutable from the client's perspective except through explicit
/// update/delete calls; the `id` is server-assigned and never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server-assigned unique id.
    pub id: u64,
    /// Post title.
    pub title: String,
    /// Post body text.
    pub body: String,
    /// Id of the authoring user.
    pub user_id: u64,
    /// Ordered tag list. May be empty.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Reaction counters. Missing counters read as zero.
    #[serde(default)]
    pub reactions: PostReactions,
}

/// One page of posts from the list or search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPage {
    /// Posts in this page.
    pub posts: Vec<Post>,
    /// Total number of posts on the server.
    pub total: u64,
    /// Number of posts skipped before this page.
    pub skip: u64,
    /// Requested page size.
    pub limit: u64,
}

/// Payload for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Post body text.
    pub body: String,
    /// Id of the authoring user.
    pub user_id: u64,
    /// Tags for the new post.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Initial reaction counters, zeroed unless stated.
    #[serde(default)]
    pub reactions: PostReactions,
}

/// Partial update payload. Absent fields are left untouched server-side
/// and are not serialized at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    /// New title, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// New authoring user, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    /// Replacement tag list, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Replacement reaction counters, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<PostReactions>,
}

/// Normalize free-text tag input into a tag list.
///
/// Splits on commas, trims whitespace, and drops empty entries, so
/// `"a, b ,,c"` becomes `["a", "b", "c"]`.
pub fn parse_tags(input: &str) -> Vec<String> {
    input.split(',').map(str::trim).filter(|tag| !tag.is_empty()).map(String::from).collect()
}
