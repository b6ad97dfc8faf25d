//! WebSocket transport for feed connections.
//!
//! Wraps a `tokio-tungstenite` stream behind the [`Transport`] trait so the
//! session logic can be driven by scripted transports in tests. Owns frame
//! handling: JSON decode of text and binary frames, explicit pong replies,
//! close-frame reasons, and shutdown via a cancellation token that any holder
//! of the paired [`TransportCloser`] can trigger.

use crate::error::{FeedError, Result};
use crate::event_handlers::{DisconnectReason, EventHandlers};
use crate::models::{FeedMessage, FeedRequest};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{error::Error as WsError, protocol::Message},
    MaybeTlsStream,
};
use tokio_util::sync::CancellationToken;

type WsStream = tokio_tungstenite::WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A bidirectional, message-framed connection to the feed.
///
/// One request out, a stream of messages in. The production implementation
/// is [`WsTransport`].
#[async_trait]
pub trait Transport: Send {
    /// Send one request to the feed.
    async fn send(&mut self, request: &FeedRequest) -> Result<()>;

    /// Receive the next decoded message from the feed.
    ///
    /// Fails when the connection closes (by either side, including through
    /// the shutdown token) or a frame cannot be decoded.
    async fn receive(&mut self) -> Result<FeedMessage>;

    /// Token cancelled when the connection is being shut down.
    fn shutdown_token(&self) -> CancellationToken;
}

/// Closes a transport from outside the task that owns it.
///
/// Cancelling is idempotent and safe while the owning task is blocked in
/// `receive`; the blocked call observes the token, sends a best-effort Close
/// frame, and fails.
#[derive(Debug, Clone)]
pub(crate) struct TransportCloser {
    shutdown: CancellationToken,
}

impl TransportCloser {
    /// Request the transport to close.
    pub(crate) fn close(&self) {
        self.shutdown.cancel();
    }
}

/// Normalize an endpoint URL to a WebSocket URL.
///
/// `http(s)` schemes are rewritten to `ws(s)`; URLs already using a
/// WebSocket scheme pass through unchanged apart from trailing-slash
/// trimming.
fn resolve_ws_url(url: &str) -> String {
    let normalized = url.trim_end_matches('/');
    normalized
        .replace("http://", "ws://")
        .replace("https://", "wss://")
}

/// Establish a WebSocket connection to the feed.
///
/// Returns the transport together with a [`TransportCloser`] the supervisor
/// keeps for cancellation. Dial failures are returned, not reported through
/// the handlers; the supervisor decides whether the failure is worth
/// reporting.
pub(crate) async fn dial(
    url: &str,
    handlers: EventHandlers,
) -> Result<(WsTransport, TransportCloser)> {
    let request_url = resolve_ws_url(url);
    log::debug!("[feedlink] Dialing feed at {}", request_url);

    let (stream, _) = match connect_async(request_url.as_str()).await {
        Ok(result) => result,
        Err(WsError::Http(response)) => {
            let status = response.status();
            let body_text = response
                .into_body()
                .as_ref()
                .and_then(|b| {
                    if b.is_empty() {
                        None
                    } else {
                        Some(String::from_utf8_lossy(b).into_owned())
                    }
                })
                .unwrap_or_default();
            let message = match status.as_u16() {
                401 => "Unauthorized: feed requires valid credentials".to_string(),
                403 => "Forbidden: access to feed denied".to_string(),
                code => {
                    if body_text.is_empty() {
                        format!("Feed HTTP error: {}", code)
                    } else {
                        format!("Feed HTTP error {}: {}", code, body_text)
                    }
                },
            };
            return Err(FeedError::DialError(message));
        },
        Err(e) => return Err(FeedError::DialError(e.to_string())),
    };

    let shutdown = CancellationToken::new();
    let closer = TransportCloser {
        shutdown: shutdown.clone(),
    };

    Ok((
        WsTransport {
            stream,
            shutdown,
            handlers,
        },
        closer,
    ))
}

/// Production transport over a `tokio-tungstenite` WebSocket stream.
pub struct WsTransport {
    stream: WsStream,
    shutdown: CancellationToken,
    handlers: EventHandlers,
}

fn decode_message(text: &str) -> Result<FeedMessage> {
    serde_json::from_str(text)
        .map_err(|e| FeedError::ReceiveError(format!("Failed to decode feed message: {}", e)))
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, request: &FeedRequest) -> Result<()> {
        let payload = serde_json::to_string(request)
            .map_err(|e| FeedError::SendError(format!("Failed to serialize request: {}", e)))?;
        self.handlers.emit_send(&payload);
        self.stream
            .send(Message::Text(payload.into()))
            .await
            .map_err(|e| FeedError::SendError(e.to_string()))
    }

    async fn receive(&mut self) -> Result<FeedMessage> {
        loop {
            let frame = tokio::select! {
                biased;

                // Shutdown requested by the supervisor. Close the socket so
                // the server sees a Close frame, then fail the receive. The
                // supervisor emits the disconnect event for this path.
                _ = self.shutdown.cancelled() => {
                    let _ = self.stream.close(None).await;
                    return Err(FeedError::ReceiveError("connection closed".to_string()));
                }

                frame = self.stream.next() => frame,
            };

            match frame {
                Some(Ok(Message::Text(text))) => {
                    self.handlers.emit_receive(&text);
                    return decode_message(&text);
                },
                Some(Ok(Message::Binary(data))) => {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    self.handlers.emit_receive(&text);
                    return decode_message(&text);
                },
                Some(Ok(Message::Close(frame))) => {
                    let reason = match frame {
                        Some(f) => DisconnectReason::with_code(f.reason.to_string(), f.code.into()),
                        None => DisconnectReason::new("Feed closed connection"),
                    };
                    let message = reason.to_string();
                    self.handlers.emit_disconnect(reason);
                    return Err(FeedError::ReceiveError(message));
                },
                Some(Ok(Message::Ping(payload))) => {
                    // tokio-tungstenite auto-responds, but be explicit for clarity.
                    let _ = self.stream.send(Message::Pong(payload)).await;
                },
                Some(Ok(Message::Pong(_))) => {},
                Some(Ok(Message::Frame(_))) => {},
                Some(Err(e)) => {
                    let msg = e.to_string();
                    self.handlers
                        .emit_disconnect(DisconnectReason::new(format!("WebSocket error: {}", msg)));
                    return Err(FeedError::ReceiveError(msg));
                },
                None => {
                    self.handlers
                        .emit_disconnect(DisconnectReason::new("WebSocket stream ended"));
                    return Err(FeedError::ReceiveError("WebSocket stream ended".to_string()));
                },
            }
        }
    }

    fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}
