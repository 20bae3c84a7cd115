//! Post query engine.
//!
//! Derives a display-ordered subset of a bounded post collection from the
//! current filter state. Pure and synchronous: safe to recompute on every
//! filter change, never mutates its input.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::post::Post;

/// Maximum number of posts held by a feed; callers cap their page to this
/// before handing it to the engine. Fixed policy, not configurable.
pub const FEED_CAP: usize = 50;

/// Display ordering for the filtered feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Descending by id.
    #[default]
    Newest,
    /// Ascending by id.
    Oldest,
    /// Descending by like count.
    Liked,
    /// Alias for [`SortMode::Liked`].
    Popular,
    /// Offered by the sidebar but no ordering is defined for it; the
    /// filtered order passes through untouched.
    Disliked,
    /// Case-insensitive title, ascending.
    TitleAsc,
    /// Case-insensitive title, descending.
    TitleDesc,
}

impl SortMode {
    /// All modes in sidebar order, for cycling through in a UI.
    pub const ALL: [SortMode; 6] = [
        SortMode::Newest,
        SortMode::Oldest,
        SortMode::Liked,
        SortMode::Disliked,
        SortMode::TitleAsc,
        SortMode::TitleDesc,
    ];

    /// Stable textual name, as accepted by [`SortMode::from_str`].
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::Liked => "liked",
            SortMode::Popular => "popular",
            SortMode::Disliked => "disliked",
            SortMode::TitleAsc => "title-asc",
            SortMode::TitleDesc => "title-desc",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input named a sort mode that does not exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown sort mode: {0}")]
pub struct UnknownSortMode(pub String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "liked" => Ok(SortMode::Liked),
            "popular" => Ok(SortMode::Popular),
            "disliked" => Ok(SortMode::Disliked),
            "title-asc" => Ok(SortMode::TitleAsc),
            "title-desc" => Ok(SortMode::TitleDesc),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}

/// User-supplied filter and sort parameters for the feed.
///
/// Transient and UI-local; reset only by an explicit [`FilterState::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search_term: String,
    selected_categories: Vec<String>,
    sort_mode: SortMode,
}

impl FilterState {
    /// Create an empty filter state (no search, no categories, newest).
    pub fn new() -> Self {
        Self::default()
    }

    /// Current free-text search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Replace the search term.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Selected categories in insertion order.
    pub fn selected_categories(&self) -> &[String] {
        &self.selected_categories
    }

    /// Add the category if absent, remove it if present.
    pub fn toggle_category(&mut self, category: &str) {
        if let Some(pos) = self.selected_categories.iter().position(|c| c == category) {
            self.selected_categories.remove(pos);
        } else {
            self.selected_categories.push(category.to_string());
        }
    }

    /// Remove a selected category. No-op if it is not selected.
    pub fn remove_category(&mut self, category: &str) {
        self.selected_categories.retain(|c| c != category);
    }

    /// Current sort mode.
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Replace the sort mode.
    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    /// Reset everything to the defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True iff any filter diverges from the defaults: non-blank search,
    /// non-empty category selection, or a sort other than newest.
    ///
    /// Drives whether a clear-filters affordance is shown and whether
    /// result-count messaging differs from total-count messaging.
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.trim().is_empty()
            || !self.selected_categories.is_empty()
            || self.sort_mode != SortMode::Newest
    }

    /// Derive the display-ordered subset of `posts` for these filters.
    ///
    /// Search and category predicates combine by AND. Sorting is stable, so
    /// ties keep their relative input order. The input is never mutated;
    /// the result is a fresh vector.
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        let term = self.search_term.trim().to_lowercase();

        let mut filtered: Vec<Post> = posts
            .iter()
            .filter(|post| term.is_empty() || matches_search(post, &term))
            .filter(|post| self.matches_categories(post))
            .cloned()
            .collect();

        match self.sort_mode {
            SortMode::Newest => filtered.sort_by(|a, b| b.id.cmp(&a.id)),
            SortMode::Oldest => filtered.sort_by(|a, b| a.id.cmp(&b.id)),
            SortMode::Liked | SortMode::Popular => {
                filtered.sort_by(|a, b| b.reactions.likes.cmp(&a.reactions.likes));
            },
            SortMode::TitleAsc => {
                filtered.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
            },
            SortMode::TitleDesc => {
                filtered.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()));
            },
            SortMode::Disliked => {},
        }

        filtered
    }

    /// Conjunctive category match: every selected category must be a
    /// case-insensitive substring of at least one tag. A post with no tags
    /// never matches a non-empty selection.
    fn matches_categories(&self, post: &Post) -> bool {
        self.selected_categories.iter().all(|category| {
            let category = category.to_lowercase();
            post.tags.iter().any(|tag| tag.to_lowercase().contains(&category))
        })
    }
}

/// Search match: the lowercased trimmed term is a substring of the title,
/// the body, or any tag.
fn matches_search(post: &Post, term: &str) -> bool {
    post.title.to_lowercase().contains(term)
        || post.body.to_lowercase().contains(term)
        || post.tags.iter().any(|tag| tag.to_lowercase().contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostReactions;

    fn post(id: u64, title: &str, tags: &[&str], likes: u64) -> Post {
        Post {
            id,
            title: title.to_string(),
            body: format!("body of {title}"),
            user_id: 1,
            tags: tags.iter().map(ToString::to_string).collect(),
            reactions: PostReactions { likes, dislikes: 0 },
        }
    }

    #[test]
    fn liked_sorts_by_descending_likes() {
        let posts = vec![post(1, "A", &[], 5), post(2, "B", &[], 10)];

        let mut filters = FilterState::new();
        filters.set_sort_mode(SortMode::Liked);

        let ids: Vec<u64> = filters.apply(&posts).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn search_matches_tag_substring() {
        let posts = vec![post(1, "untitled", &["category-a"], 0)];

        let mut filters = FilterState::new();
        filters.set_search_term("cat");
        filters.set_sort_mode(SortMode::Oldest);

        assert_eq!(filters.apply(&posts).len(), 1);
    }

    #[test]
    fn blank_search_retains_all() {
        let posts = vec![post(1, "A", &[], 0), post(2, "B", &[], 0)];

        let mut filters = FilterState::new();
        filters.set_search_term("   ");

        assert_eq!(filters.apply(&posts).len(), 2);
    }

    #[test]
    fn categories_are_conjunctive() {
        // Tagged "love story" only: matches "love" but not "fiction".
        let posts = vec![post(1, "A", &["love story"], 0)];

        let mut filters = FilterState::new();
        filters.toggle_category("fiction");
        filters.toggle_category("love");

        assert!(filters.apply(&posts).is_empty());

        filters.remove_category("fiction");
        assert_eq!(filters.apply(&posts).len(), 1);
    }

    #[test]
    fn untagged_post_never_matches_category_filter() {
        let posts = vec![post(1, "A", &[], 0)];

        let mut filters = FilterState::new();
        filters.toggle_category("history");

        assert!(filters.apply(&posts).is_empty());
    }

    #[test]
    fn like_ties_keep_input_order() {
        let posts = vec![post(3, "C", &[], 7), post(1, "A", &[], 7), post(2, "B", &[], 7)];

        let mut filters = FilterState::new();
        filters.set_sort_mode(SortMode::Liked);

        let ids: Vec<u64> = filters.apply(&posts).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn disliked_mode_keeps_filtered_order() {
        let posts = vec![post(2, "B", &[], 1), post(1, "A", &[], 9)];

        let mut filters = FilterState::new();
        filters.set_sort_mode(SortMode::Disliked);

        let ids: Vec<u64> = filters.apply(&posts).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn toggle_preserves_insertion_order() {
        let mut filters = FilterState::new();
        filters.toggle_category("crime");
        filters.toggle_category("french");
        filters.toggle_category("magical");
        filters.toggle_category("french");

        assert_eq!(filters.selected_categories(), &["crime", "magical"]);
    }

    #[test]
    fn active_filters_flag() {
        let mut filters = FilterState::new();
        assert!(!filters.has_active_filters());

        filters.set_sort_mode(SortMode::TitleAsc);
        assert!(filters.has_active_filters());

        filters.clear();
        assert!(!filters.has_active_filters());

        filters.set_search_term("mystery");
        assert!(filters.has_active_filters());
    }

    #[test]
    fn sort_mode_round_trips_through_names() {
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>(), Ok(mode));
        }
        assert_eq!("popular".parse::<SortMode>(), Ok(SortMode::Popular));
        assert!("best".parse::<SortMode>().is_err());
    }
}
