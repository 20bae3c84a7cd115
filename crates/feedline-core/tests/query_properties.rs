//! Property-based tests for the post query engine.
//!
//! Verifies the engine's algebraic properties (identity, idempotence,
//! purity of sorting) under arbitrary post collections and filters.

use feedline_core::{FilterState, Post, PostReactions, SortMode};
use proptest::prelude::*;

fn post_strategy() -> impl Strategy<Value = Post> {
    (
        1u64..500,
        "[a-z]{0,12}",
        "[a-z ]{0,24}",
        prop::collection::vec("[a-z]{1,8}", 0..4),
        0u64..100,
    )
        .prop_map(|(id, title, body, tags, likes)| Post {
            id,
            title,
            body,
            user_id: 1,
            tags,
            reactions: PostReactions { likes, dislikes: 0 },
        })
}

fn posts_strategy() -> impl Strategy<Value = Vec<Post>> {
    prop::collection::vec(post_strategy(), 0..30)
}

fn filters_strategy() -> impl Strategy<Value = FilterState> {
    let sort = prop_oneof![
        Just(SortMode::Newest),
        Just(SortMode::Oldest),
        Just(SortMode::Liked),
        Just(SortMode::Disliked),
        Just(SortMode::TitleAsc),
        Just(SortMode::TitleDesc),
    ];

    ("[a-z]{0,4}", prop::collection::vec("[a-z]{1,4}", 0..3), sort).prop_map(
        |(term, categories, sort_mode)| {
            let mut filters = FilterState::new();
            filters.set_search_term(term);
            for category in &categories {
                filters.toggle_category(category);
            }
            filters.set_sort_mode(sort_mode);
            filters
        },
    )
}

proptest! {
    /// Default filters on an already newest-ordered feed are the identity.
    #[test]
    fn prop_default_filters_are_identity_on_ordered_input(posts in posts_strategy()) {
        let mut posts = posts;
        posts.sort_by(|a, b| b.id.cmp(&a.id));

        let filters = FilterState::new();
        prop_assert_eq!(filters.apply(&posts), posts);
    }

    /// Default filters never drop anything, whatever the input order.
    #[test]
    fn prop_default_filters_retain_all(posts in posts_strategy()) {
        let filters = FilterState::new();
        prop_assert_eq!(filters.apply(&posts).len(), posts.len());
    }

    /// Applying the same filters to their own output changes nothing.
    #[test]
    fn prop_filtering_is_idempotent(
        posts in posts_strategy(),
        filters in filters_strategy(),
    ) {
        let once = filters.apply(&posts);
        let twice = filters.apply(&once);
        prop_assert_eq!(once, twice);
    }

    /// Sort is a pure function of the filtered set, not cumulative:
    /// liked → newest → liked reproduces the first liked ordering.
    #[test]
    fn prop_sorting_is_pure(posts in posts_strategy()) {
        let mut filters = FilterState::new();

        filters.set_sort_mode(SortMode::Liked);
        let first = filters.apply(&posts);

        filters.set_sort_mode(SortMode::Newest);
        let _ = filters.apply(&posts);

        filters.set_sort_mode(SortMode::Liked);
        prop_assert_eq!(first, filters.apply(&posts));
    }

    /// Output is always a sub-multiset of the input, and the input is
    /// never reordered or mutated by the engine.
    #[test]
    fn prop_output_is_subset_and_input_untouched(
        posts in posts_strategy(),
        filters in filters_strategy(),
    ) {
        let snapshot = posts.clone();
        let out = filters.apply(&posts);

        prop_assert_eq!(&posts, &snapshot);
        prop_assert!(out.len() <= posts.len());
        for post in &out {
            prop_assert!(posts.contains(post));
        }
    }

    /// Search and category predicates commute: applying them in either
    /// order (as the sole active filter each time) intersects to the same
    /// result as applying both at once.
    #[test]
    fn prop_predicates_commute(
        posts in posts_strategy(),
        term in "[a-z]{1,3}",
        category in "[a-z]{1,3}",
    ) {
        let mut both = FilterState::new();
        both.set_search_term(term.clone());
        both.toggle_category(&category);
        both.set_sort_mode(SortMode::Disliked); // keep filtered order

        let mut search_only = FilterState::new();
        search_only.set_search_term(term);
        search_only.set_sort_mode(SortMode::Disliked);

        let mut category_only = FilterState::new();
        category_only.toggle_category(&category);
        category_only.set_sort_mode(SortMode::Disliked);

        let chained = category_only.apply(&search_only.apply(&posts));
        prop_assert_eq!(both.apply(&posts), chained);
    }
}
