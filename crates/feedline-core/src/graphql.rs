//! Tagged request type behind the query console.
//!
//! The console accepts GraphQL-looking query text, but the backing service
//! is a plain REST API: recognition is shallow keyword matching, not schema
//! resolution. The text is parsed exactly once at this boundary into a
//! [`GraphqlRequest`], so downstream dispatch works on a closed enum
//! instead of re-testing substrings of raw query text.

use serde_json::Value;
use thiserror::Error;

/// Default page size when the query supplies no `limit` variable.
pub const DEFAULT_LIST_LIMIT: u32 = 10;

/// Why a console query could not be turned into a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphqlParseError {
    /// The query text names none of the supported operations.
    #[error("unrecognized query: expected a posts, post(id) or searchPosts selection")]
    UnrecognizedQuery,

    /// A required variable was not supplied.
    #[error("missing variable: ${0}")]
    MissingVariable(&'static str),

    /// A variable was supplied with an unusable type or value.
    #[error("invalid variable: ${0}")]
    InvalidVariable(&'static str),
}

/// A recognized console request, ready for REST dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphqlRequest {
    /// Fetch a page of posts.
    ListPosts {
        /// Page size.
        limit: u32,
        /// Offset into the collection.
        skip: u32,
    },
    /// Fetch a single post by id.
    GetPost {
        /// Post id.
        id: u64,
    },
    /// Full-text search over posts.
    SearchPosts {
        /// Search string.
        query: String,
    },
}

impl GraphqlRequest {
    /// Recognize a query string and bind its variables.
    ///
    /// Recognition is substring matching with a fixed precedence, most
    /// specific keyword first, so text mentioning several keywords
    /// dispatches deterministically: `searchPosts`, then `post(`, then
    /// `posts`.
    pub fn parse(query: &str, variables: Option<&Value>) -> Result<Self, GraphqlParseError> {
        if query.contains("searchPosts") {
            let search = required_string_var(variables, "query")?;
            Ok(Self::SearchPosts { query: search })
        } else if query.contains("post(") {
            let id = int_var(variables, "id")?
                .ok_or(GraphqlParseError::MissingVariable("id"))?;
            Ok(Self::GetPost { id })
        } else if query.contains("posts") {
            let limit = bounded_var(variables, "limit")?.unwrap_or(DEFAULT_LIST_LIMIT);
            let skip = bounded_var(variables, "skip")?.unwrap_or(0);
            Ok(Self::ListPosts { limit, skip })
        } else {
            Err(GraphqlParseError::UnrecognizedQuery)
        }
    }
}

/// Read an optional non-negative integer variable. Numeric strings are
/// accepted; anything else is invalid.
fn int_var(variables: Option<&Value>, name: &'static str) -> Result<Option<u64>, GraphqlParseError> {
    match variables.and_then(|vars| vars.get(name)) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
            .map(Some)
            .ok_or(GraphqlParseError::InvalidVariable(name)),
    }
}

/// As [`int_var`], but bounded to `u32` range.
fn bounded_var(
    variables: Option<&Value>,
    name: &'static str,
) -> Result<Option<u32>, GraphqlParseError> {
    match int_var(variables, name)? {
        None => Ok(None),
        Some(n) => {
            u32::try_from(n).map(Some).map_err(|_| GraphqlParseError::InvalidVariable(name))
        },
    }
}

/// Read a required string variable.
fn required_string_var(
    variables: Option<&Value>,
    name: &'static str,
) -> Result<String, GraphqlParseError> {
    match variables.and_then(|vars| vars.get(name)) {
        None | Some(Value::Null) => Err(GraphqlParseError::MissingVariable(name)),
        Some(value) => value
            .as_str()
            .map(String::from)
            .ok_or(GraphqlParseError::InvalidVariable(name)),
    }
}
