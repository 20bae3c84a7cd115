//! Integration tests for the WebSocket chat transport.
//!
//! Each test runs a real WebSocket server on loopback and connects the
//! real transport to it, covering echo delivery, malformed-frame handling,
//! and both reconnect policies.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use feedline_client::{ChatConfig, ChatEvent, ChatHandle, chat};
use feedline_core::{ChatMessage, MessageKind, ReconnectPolicy};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpListener, time::timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};

const WAIT: Duration = Duration::from_secs(5);

fn message(id: &str, text: &str) -> ChatMessage {
    ChatMessage {
        id: id.into(),
        user_id: "user-test".into(),
        username: "Guest".into(),
        text: text.into(),
        timestamp: DateTime::<Utc>::UNIX_EPOCH,
        kind: MessageKind::Message,
    }
}

async fn next(handle: &mut ChatHandle) -> Option<ChatEvent> {
    timeout(WAIT, handle.next_event()).await.ok().flatten()
}

/// Echo server: reflects every text frame back on every connection.
async fn start_echo_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepts = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&accepts);
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else { break };
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let Ok(mut socket) = accept_async(stream).await else { return };
                while let Some(Ok(frame)) = socket.next().await {
                    if frame.is_text() && socket.send(frame).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    (format!("ws://{addr}"), accepts)
}

#[tokio::test]
async fn echo_round_trip_delivers_frame() {
    let (url, _accepts) = start_echo_server().await;
    let mut handle = chat::spawn(ChatConfig::fire_once(url));

    assert_eq!(next(&mut handle).await, Some(ChatEvent::Opened));

    let sent = message("m1", "hello there");
    assert!(handle.send(sent.clone()).await);

    assert_eq!(next(&mut handle).await, Some(ChatEvent::Frame(sent)));
    handle.stop();
}

#[tokio::test]
async fn malformed_frames_are_dropped_silently() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let valid = message("sys-1", "welcome");
    let valid_json = valid.to_json().unwrap();
    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else { return };
        let Ok(mut socket) = accept_async(stream).await else { return };
        // Garbage first, then a well-formed frame.
        let _ = socket.send(Message::text("not json at all")).await;
        let _ = socket.send(Message::text(r#"{"id": 17}"#)).await;
        let _ = socket.send(Message::text(valid_json)).await;
        // Keep the connection open until the client is done.
        while socket.next().await.is_some() {}
    });

    let mut handle = chat::spawn(ChatConfig::fire_once(format!("ws://{addr}")));

    assert_eq!(next(&mut handle).await, Some(ChatEvent::Opened));
    // The two malformed frames produce no events at all; the first thing
    // delivered is the valid frame.
    assert_eq!(next(&mut handle).await, Some(ChatEvent::Frame(valid)));
    handle.stop();
}

#[tokio::test]
async fn fire_once_stays_down_after_disconnect() {
    // Accept a single connection, close it, then stop listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepts = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&accepts);
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut socket) = accept_async(stream).await {
                let _ = socket.close(None).await;
            }
        }
    });

    let mut handle = chat::spawn(ChatConfig::fire_once(format!("ws://{addr}")));

    assert_eq!(next(&mut handle).await, Some(ChatEvent::Opened));
    assert_eq!(next(&mut handle).await, Some(ChatEvent::Closed));

    // The task must end without a reconnect attempt.
    assert_eq!(next(&mut handle).await, None);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(accepts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bounded_retry_reconnects_after_disconnect() {
    // First connection is closed by the server; later ones are kept open.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepts = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&accepts);
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else { break };
            let n = counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let Ok(mut socket) = accept_async(stream).await else { return };
                if n == 0 {
                    let _ = socket.close(None).await;
                } else {
                    while socket.next().await.is_some() {}
                }
            });
        }
    });

    let policy =
        ReconnectPolicy::BoundedRetry { base_delay: Duration::from_millis(10), max_attempts: 5 };
    let mut handle = chat::spawn(ChatConfig::with_policy(format!("ws://{addr}"), policy));

    assert_eq!(next(&mut handle).await, Some(ChatEvent::Opened));
    assert_eq!(next(&mut handle).await, Some(ChatEvent::Closed));
    assert_eq!(next(&mut handle).await, Some(ChatEvent::Opened));

    assert_eq!(accepts.load(Ordering::SeqCst), 2);
    handle.stop();
}

#[tokio::test]
async fn bounded_retry_gives_up_after_max_attempts() {
    // One good connection, then the listener goes away for good.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepts = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&accepts);
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut socket) = accept_async(stream).await {
                let _ = socket.close(None).await;
            }
        }
        // Listener drops here; further connects are refused.
    });

    let policy =
        ReconnectPolicy::BoundedRetry { base_delay: Duration::from_millis(10), max_attempts: 3 };
    let mut handle = chat::spawn(ChatConfig::with_policy(format!("ws://{addr}"), policy));

    let mut opened = 0;
    let mut errors = 0;
    while let Some(event) = next(&mut handle).await {
        match event {
            ChatEvent::Opened => opened += 1,
            ChatEvent::Error { .. } => errors += 1,
            ChatEvent::Frame(_) | ChatEvent::Closed => {},
        }
    }

    // One successful connection, then exactly max_attempts failed
    // reconnects before the task gives up.
    assert_eq!(opened, 1);
    assert_eq!(errors, 3);
    assert_eq!(accepts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn teardown_stops_bounded_retry() {
    let (url, accepts) = start_echo_server().await;

    let policy =
        ReconnectPolicy::BoundedRetry { base_delay: Duration::from_millis(10), max_attempts: 5 };
    let mut handle = chat::spawn(ChatConfig::with_policy(url, policy));

    assert_eq!(next(&mut handle).await, Some(ChatEvent::Opened));
    handle.stop();

    assert_eq!(next(&mut handle).await, None);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(accepts.load(Ordering::SeqCst), 1);
}
