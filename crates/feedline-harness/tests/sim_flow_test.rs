//! End-to-end simulation: the real Runtime over the scripted driver.
//!
//! The same orchestration loop that drives the terminal frontend runs
//! here against the in-memory driver, so these tests cover the full
//! action/event cycle: bootstrap, chat echo reconciliation, filtering,
//! CRUD, and the console.

use feedline_app::{ConnectionState, Runtime};
use feedline_core::{NewPost, Post, PostPatch, PostReactions};
use feedline_harness::{SimCommand, SimDriver, SimEnv};
use serde_json::json;

fn fixture() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            title: "A quiet morning".into(),
            body: "mist over the harbor".into(),
            user_id: 7,
            tags: vec!["history".into()],
            reactions: PostReactions { likes: 5, dislikes: 1 },
        },
        Post {
            id: 2,
            title: "Love and other storms".into(),
            body: "a fiction of sorts".into(),
            user_id: 8,
            tags: vec!["fiction".into(), "love".into()],
            reactions: PostReactions { likes: 10, dislikes: 0 },
        },
        Post {
            id: 3,
            title: "Crime on the docks".into(),
            body: "nobody saw anything".into(),
            user_id: 7,
            tags: vec!["crime".into(), "mystery".into()],
            reactions: PostReactions { likes: 2, dislikes: 4 },
        },
    ]
}

async fn run_script(script: Vec<SimCommand>) -> feedline_harness::Snapshot {
    let env = SimEnv::with_seed(42);
    let (driver, probe) = SimDriver::new(env.clone(), fixture(), script);
    let runtime = Runtime::new(driver, env, "Guest", 50);

    runtime.run().await.unwrap();
    probe.snapshot()
}

#[tokio::test]
async fn bootstrap_loads_feed_and_opens_chat() {
    let snapshot = run_script(vec![]).await;

    assert!(snapshot.violations.is_empty(), "{:?}", snapshot.violations);
    // Newest first by default.
    assert_eq!(snapshot.visible_ids, vec![3, 2, 1]);
    assert_eq!(snapshot.connection, Some(ConnectionState::Open));
}

#[tokio::test]
async fn sent_message_and_its_echo_stay_single() {
    let snapshot = run_script(vec![
        SimCommand::SendChat("hello echo".into()),
        SimCommand::SendChat("second".into()),
    ])
    .await;

    assert!(snapshot.violations.is_empty(), "{:?}", snapshot.violations);
    // Two sends, two echoes reconciled away: exactly two visible entries.
    assert_eq!(snapshot.chat_ids.len(), 2);
}

#[tokio::test]
async fn search_and_categories_filter_the_feed() {
    let snapshot = run_script(vec![
        SimCommand::SetSearch("fiction".into()),
        SimCommand::ToggleCategory("love".into()),
    ])
    .await;

    assert!(snapshot.violations.is_empty(), "{:?}", snapshot.violations);
    assert_eq!(snapshot.visible_ids, vec![2]);
}

#[tokio::test]
async fn clear_filters_restores_the_feed() {
    let snapshot = run_script(vec![
        SimCommand::SetSearch("nothing matches this".into()),
        SimCommand::ClearFilters,
    ])
    .await;

    assert_eq!(snapshot.visible_ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn create_update_delete_round_trip() {
    let snapshot = run_script(vec![
        SimCommand::CreatePost(NewPost {
            title: "Fresh ink".into(),
            body: "hot off the press".into(),
            user_id: 9,
            tags: vec!["news".into()],
            reactions: PostReactions::default(),
        }),
        SimCommand::UpdatePost {
            id: 1,
            patch: PostPatch { title: Some("A loud morning".into()), ..PostPatch::default() },
        },
        SimCommand::DeletePost(3),
    ])
    .await;

    assert!(snapshot.violations.is_empty(), "{:?}", snapshot.violations);
    // Created post got the next server id (4); post 3 is gone.
    assert_eq!(snapshot.visible_ids, vec![4, 2, 1]);
    assert!(snapshot.status.is_some_and(|s| s.contains("Deleted post #3")));
}

#[tokio::test]
async fn console_query_lands_in_history() {
    let snapshot = run_script(vec![SimCommand::RunQuery {
        query: "query GetPost($id: ID!) { post(id: $id) { id title } }".into(),
        variables: Some(json!({"id": 2})),
    }])
    .await;

    assert_eq!(snapshot.history_len, 1);
    assert_eq!(snapshot.last_query_ok, Some(true));
}

#[tokio::test]
async fn malformed_console_variables_are_inline_errors() {
    let snapshot = run_script(vec![SimCommand::RunQuery {
        query: "{ posts { total } }".into(),
        variables: Some(json!({"limit": "many"})),
    }])
    .await;

    assert_eq!(snapshot.history_len, 1);
    assert_eq!(snapshot.last_query_ok, Some(false));
}

#[tokio::test]
async fn messages_from_other_participants_append() {
    // No echo: transmitted frames vanish, so a send stays visible only
    // through its optimistic append.
    let env = SimEnv::with_seed(7);
    let (driver, probe) =
        SimDriver::new(env.clone(), fixture(), vec![SimCommand::SendChat("into the void".into())]);
    let runtime = Runtime::new(driver.without_echo(), env, "Guest", 50);

    runtime.run().await.unwrap();

    let snapshot = probe.snapshot();
    assert_eq!(snapshot.chat_ids.len(), 1);
    assert!(snapshot.violations.is_empty(), "{:?}", snapshot.violations);
}
