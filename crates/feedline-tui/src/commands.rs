//! Slash-command parsing for the input line.
//!
//! Anything starting with `/` is a command; everything else is plain
//! text whose meaning depends on the focused pane (search term, chat
//! message, or console query).

use feedline_core::{NewPost, PostPatch, SortMode, post};

/// Author id stamped on posts created from the TUI.
const DEFAULT_USER_ID: u64 = 1;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Change the feed sort mode.
    Sort {
        /// Parsed mode.
        mode: SortMode,
    },
    /// Toggle a feed category.
    Category {
        /// Category name.
        name: String,
    },
    /// Reset all feed filters.
    ClearFilters,
    /// Refetch the feed.
    Refresh,
    /// Create a post.
    New {
        /// Assembled create payload.
        post: NewPost,
    },
    /// Partially update a post.
    Edit {
        /// Post to update.
        id: u64,
        /// Fields to change.
        patch: PostPatch,
    },
    /// Delete a post.
    Delete {
        /// Post to delete.
        id: u64,
    },
    /// Reopen the chat connection.
    Connect,
    /// Quit the application.
    Quit,
    /// Plain text (not a command).
    Message {
        /// The text as typed.
        content: String,
    },
    /// Unknown command name.
    Unknown {
        /// The offending input.
        input: String,
    },
    /// Known command, unusable arguments.
    InvalidArgs {
        /// Command name.
        command: String,
        /// What was wrong.
        error: String,
    },
}

/// Parse one input line.
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Message { content: trimmed.to_string() };
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "sort" => match args.parse::<SortMode>() {
            Ok(mode) => Command::Sort { mode },
            Err(error) => Command::InvalidArgs { command: "sort".into(), error: error.to_string() },
        },
        "cat" | "category" => {
            if args.is_empty() {
                Command::InvalidArgs { command: name.into(), error: "expected a category".into() }
            } else {
                Command::Category { name: args.to_string() }
            }
        },
        "clear" => Command::ClearFilters,
        "refresh" => Command::Refresh,
        "new" => parse_new(args),
        "edit" => parse_edit(args),
        "delete" => match args.parse::<u64>() {
            Ok(id) => Command::Delete { id },
            Err(_) => {
                Command::InvalidArgs { command: "delete".into(), error: "expected a post id".into() }
            },
        },
        "connect" => Command::Connect,
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: trimmed.to_string() },
    }
}

/// `/new <title> | <body> [| tag, tag]`
fn parse_new(args: &str) -> Command {
    let mut parts = args.splitn(3, '|').map(str::trim);
    let title = parts.next().unwrap_or_default();
    let Some(body) = parts.next() else {
        return Command::InvalidArgs {
            command: "new".into(),
            error: "expected `title | body [| tags]`".into(),
        };
    };

    if title.is_empty() || body.is_empty() {
        return Command::InvalidArgs {
            command: "new".into(),
            error: "title and body must not be empty".into(),
        };
    }

    let tags = parts.next().map(post::parse_tags).unwrap_or_default();

    Command::New {
        post: NewPost {
            title: title.to_string(),
            body: body.to_string(),
            user_id: DEFAULT_USER_ID,
            tags,
            reactions: Default::default(),
        },
    }
}

/// `/edit <id> <field>=<value>` where field is title, body, tags, or user.
fn parse_edit(args: &str) -> Command {
    let invalid = |error: &str| Command::InvalidArgs { command: "edit".into(), error: error.into() };

    let Some((id, assignment)) = args.split_once(char::is_whitespace) else {
        return invalid("expected `<id> <field>=<value>`");
    };
    let Ok(id) = id.parse::<u64>() else {
        return invalid("expected a post id");
    };
    let Some((field, value)) = assignment.split_once('=') else {
        return invalid("expected `<field>=<value>`");
    };

    let value = value.trim();
    let mut patch = PostPatch::default();
    match field.trim() {
        "title" => patch.title = Some(value.to_string()),
        "body" => patch.body = Some(value.to_string()),
        "tags" => patch.tags = Some(post::parse_tags(value)),
        "user" => match value.parse::<u64>() {
            Ok(user_id) => patch.user_id = Some(user_id),
            Err(_) => return invalid("expected a numeric user id"),
        },
        other => return invalid(&format!("unknown field `{other}`")),
    }

    Command::Edit { id, patch }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(parse("hello there"), Command::Message { content: "hello there".into() });
    }

    #[test]
    fn sort_parses_modes() {
        assert_eq!(parse("/sort liked"), Command::Sort { mode: SortMode::Liked });
        assert!(matches!(parse("/sort best"), Command::InvalidArgs { .. }));
    }

    #[test]
    fn new_builds_a_post() {
        let Command::New { post } = parse("/new A title | Some body | fiction, love") else {
            panic!("expected New");
        };
        assert_eq!(post.title, "A title");
        assert_eq!(post.body, "Some body");
        assert_eq!(post.tags, vec!["fiction", "love"]);
    }

    #[test]
    fn new_requires_title_and_body() {
        assert!(matches!(parse("/new just a title"), Command::InvalidArgs { .. }));
        assert!(matches!(parse("/new | body only"), Command::InvalidArgs { .. }));
    }

    #[test]
    fn edit_builds_a_patch() {
        let Command::Edit { id, patch } = parse("/edit 12 title=Brand new title") else {
            panic!("expected Edit");
        };
        assert_eq!(id, 12);
        assert_eq!(patch.title.as_deref(), Some("Brand new title"));
        assert!(patch.body.is_none());
    }

    #[test]
    fn edit_rejects_unknown_fields() {
        assert!(matches!(parse("/edit 12 likes=9"), Command::InvalidArgs { .. }));
        assert!(matches!(parse("/edit twelve title=x"), Command::InvalidArgs { .. }));
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert!(matches!(parse("/frobnicate"), Command::Unknown { .. }));
    }
}
