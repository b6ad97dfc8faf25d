#![allow(dead_code)]
//! Shared helpers for integration tests.
//!
//! Every test runs against an in-process WebSocket server bound to an
//! ephemeral port, so the suite needs no external feed endpoint.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Bind a listener on an ephemeral local port and return it together with
/// the `ws://` URL a client should dial to reach it.
pub async fn bind_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let url = format!(
        "ws://{}",
        listener.local_addr().expect("listener has a local addr")
    );
    (listener, url)
}

/// Start a server that accepts each TCP connection and drops it before the
/// WebSocket handshake completes, so every dial attempt fails.
///
/// Returns the endpoint URL and a counter of connection attempts.
pub async fn start_refusing_server() -> (String, Arc<AtomicU32>) {
    let (listener, url) = bind_listener().await;
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    drop(stream);
                },
                Err(_) => return,
            }
        }
    });

    (url, attempts)
}
