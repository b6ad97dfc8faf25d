//! Reconnection policy tests against in-process feed servers.
//!
//! These cover the dial retry loop: the consecutive-failure threshold, the
//! counter reset after a successful dial, and cancellation at each stage of
//! the supervisor's life cycle.

mod common;

use common::{bind_listener, start_refusing_server};
use feedlink::{
    CancellationToken, EventHandlers, FeedClient, FeedError, MAX_CONSECUTIVE_DIAL_FAILURES,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::protocol::Message;

#[tokio::test]
async fn test_five_consecutive_dial_failures_are_fatal() {
    let (url, attempts) = start_refusing_server().await;
    let client = FeedClient::builder().url(url).build().expect("client builds");
    let (tx, _rx) = mpsc::channel(8);

    let result = timeout(
        Duration::from_secs(10),
        client.subscribe(tx, CancellationToken::new(), vec!["BTC-USD".to_string()]),
    )
    .await
    .expect("subscribe should give up before the timeout");

    match result {
        Err(FeedError::DialError(_)) => {},
        other => panic!("Expected DialError, got {:?}", other),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), MAX_CONSECUTIVE_DIAL_FAILURES);
}

#[tokio::test]
async fn test_successful_dial_resets_failure_counter() {
    let (listener, url) = bind_listener().await;
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();

    // Connections 1 and 2 are dropped before the handshake. Connection 3 is
    // a healthy feed that delivers one message and then dies abruptly, which
    // resets the failure counter. Every later connection is dropped again.
    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(pair) => pair,
                Err(_) => return,
            };
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 3 {
                tokio::spawn(async move {
                    let mut ws = match accept_async(stream).await {
                        Ok(ws) => ws,
                        Err(_) => return,
                    };
                    let _ = ws.next().await; // subscribe request
                    let payload = json!({"type": "heartbeat", "sequence": 1}).to_string();
                    let _ = ws.send(Message::Text(payload.into())).await;
                });
            } else {
                drop(stream);
            }
        }
    });

    let client = FeedClient::builder().url(url).build().expect("client builds");
    let (tx, mut rx) = mpsc::channel(8);

    let result = timeout(
        Duration::from_secs(15),
        client.subscribe(tx, CancellationToken::new(), vec!["BTC-USD".to_string()]),
    )
    .await
    .expect("subscribe should give up before the timeout");

    assert!(matches!(result, Err(FeedError::DialError(_))));
    assert_eq!(
        attempts.load(Ordering::SeqCst),
        8,
        "two failures, one success, then five more failures to reach the threshold"
    );

    // The message from the healthy connection made it through the sink.
    let message = rx.recv().await.expect("one message was relayed");
    assert_eq!(message.sequence(), Some(1));
}

#[tokio::test]
async fn test_cancel_during_retry_delay() {
    let (url, attempts) = start_refusing_server().await;
    let client = FeedClient::builder().url(url).build().expect("client builds");
    let (tx, _rx) = mpsc::channel(8);
    let cancel = CancellationToken::new();

    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { client.subscribe(tx, cancel, vec!["BTC-USD".to_string()]).await }
    });

    // Let the first dial fail so the supervisor is sitting in its retry delay.
    tokio::time::sleep(Duration::from_millis(300)).await;
    cancel.cancel();

    let result = timeout(Duration::from_secs(1), handle)
        .await
        .expect("cancellation must interrupt the retry delay")
        .expect("subscribe task should not panic");

    assert!(result.is_ok());
    assert_eq!(
        attempts.load(Ordering::SeqCst),
        1,
        "no re-dial after cancellation"
    );
}

#[tokio::test]
async fn test_pre_cancelled_subscription_never_dials() {
    let (url, attempts) = start_refusing_server().await;
    let client = FeedClient::builder().url(url).build().expect("client builds");
    let (tx, _rx) = mpsc::channel(8);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = client
        .subscribe(tx, cancel, vec!["BTC-USD".to_string()])
        .await;

    assert!(result.is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancel_closes_active_session() {
    let (listener, url) = bind_listener().await;
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = accept_async(stream).await.expect("server handshake");
        let _ = ws.next().await; // subscribe request

        let mut saw_close = false;
        while let Some(frame) = ws.next().await {
            match frame {
                Ok(Message::Close(_)) => {
                    saw_close = true;
                    break;
                },
                Ok(_) => {},
                Err(_) => break,
            }
        }
        let _ = closed_tx.send(saw_close);
    });

    let client = FeedClient::builder().url(url).build().expect("client builds");
    let (tx, _rx) = mpsc::channel(8);
    let cancel = CancellationToken::new();

    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { client.subscribe(tx, cancel, vec!["BTC-USD".to_string()]).await }
    });

    // Give the session time to establish, then cancel it mid-stream.
    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();

    let result = timeout(Duration::from_secs(1), handle)
        .await
        .expect("cancellation must end the subscription promptly")
        .expect("subscribe task should not panic");
    assert!(result.is_ok());

    // The detached session task shuts the transport down after subscribe
    // has already returned.
    let saw_close = timeout(Duration::from_secs(1), closed_rx)
        .await
        .expect("server should observe the connection closing")
        .expect("server task reports before exiting");
    assert!(saw_close, "client should send a Close frame on cancellation");
}

#[tokio::test]
async fn test_retried_dial_failures_are_reported() {
    let (url, _attempts) = start_refusing_server().await;

    let errors = Arc::new(AtomicU32::new(0));
    let all_recoverable = Arc::new(AtomicBool::new(true));
    let handlers = EventHandlers::new().on_error({
        let errors = errors.clone();
        let all_recoverable = all_recoverable.clone();
        move |err| {
            errors.fetch_add(1, Ordering::SeqCst);
            all_recoverable.fetch_and(err.recoverable, Ordering::SeqCst);
        }
    });

    let client = FeedClient::builder()
        .url(url)
        .event_handlers(handlers)
        .build()
        .expect("client builds");
    let (tx, _rx) = mpsc::channel(8);

    let result = timeout(
        Duration::from_secs(10),
        client.subscribe(tx, CancellationToken::new(), vec!["BTC-USD".to_string()]),
    )
    .await
    .expect("subscribe should give up before the timeout");

    assert!(result.is_err());
    // The four retried failures are reported through on_error; the fatal
    // fifth is returned to the caller instead.
    assert_eq!(errors.load(Ordering::SeqCst), 4);
    assert!(all_recoverable.load(Ordering::SeqCst));
}
