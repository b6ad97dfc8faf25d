//! Connection lifecycle event handlers for the feed client.
//!
//! Callback-based hooks for observing the subscription as it connects,
//! drops, and reconnects:
//!
//! - [`on_connect`](EventHandlers::on_connect): Fired each time a connection is established,
//!   including after a reconnect
//! - [`on_disconnect`](EventHandlers::on_disconnect): Fired when a connection closes
//! - [`on_error`](EventHandlers::on_error): Fired on dial and session errors the
//!   supervisor is about to retry
//! - [`on_receive`](EventHandlers::on_receive): Optional debug hook for raw inbound frames
//! - [`on_send`](EventHandlers::on_send): Optional debug hook for raw outbound frames
//!
//! Handlers run synchronously on the connection task and must not block.
//! They observe the subscription; they cannot alter its behavior or fail it.
//!
//! # Example
//!
//! ```rust,no_run
//! use feedlink::{EventHandlers, FeedClient};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handlers = EventHandlers::new()
//!     .on_connect(|| {
//!         println!("Feed connected");
//!     })
//!     .on_disconnect(|reason| {
//!         println!("Feed disconnected: {}", reason);
//!     })
//!     .on_error(|error| {
//!         eprintln!("Feed error (recoverable={}): {}", error.recoverable, error);
//!     });
//!
//! let client = FeedClient::builder()
//!     .url("wss://feed.example.com")
//!     .event_handlers(handlers)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

/// Reason for a disconnect event.
#[derive(Debug, Clone)]
pub struct DisconnectReason {
    /// Human-readable description of why the connection closed.
    pub message: String,
    /// WebSocket close code, if available (e.g. 1000 = normal, 1006 = abnormal).
    pub code: Option<u16>,
}

impl DisconnectReason {
    /// Create a new disconnect reason with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Create a new disconnect reason with a message and close code.
    pub fn with_code(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "{} (code: {})", self.message, code)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Error information passed to the `on_error` handler.
#[derive(Debug, Clone)]
pub struct ConnectionError {
    /// Human-readable error message.
    pub message: String,
    /// Whether the supervisor will keep retrying after this error.
    pub recoverable: bool,
}

impl ConnectionError {
    /// Create a new connection error.
    pub fn new(message: impl Into<String>, recoverable: bool) -> Self {
        Self {
            message: message.into(),
            recoverable,
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Type alias for the on_connect callback.
pub type OnConnectCallback = Arc<dyn Fn() + Send + Sync>;

/// Type alias for the on_disconnect callback.
pub type OnDisconnectCallback = Arc<dyn Fn(DisconnectReason) + Send + Sync>;

/// Type alias for the on_error callback.
pub type OnErrorCallback = Arc<dyn Fn(ConnectionError) + Send + Sync>;

/// Type alias for the on_receive callback (debug hook for inbound frames).
pub type OnReceiveCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Type alias for the on_send callback (debug hook for outbound frames).
pub type OnSendCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Connection lifecycle event handlers.
///
/// All handlers are optional; register only the ones you need. Handlers are
/// `Send + Sync` so they can be invoked from the supervisor's tasks.
///
/// A long-running subscription may invoke `on_connect` and `on_disconnect`
/// many times as it rides out connection losses. `on_error` with
/// `recoverable = true` is the signal that a reconnect cycle is underway;
/// a subscription that keeps cycling without making progress surfaces here.
#[derive(Clone, Default)]
pub struct EventHandlers {
    /// Called each time a feed connection is successfully established.
    pub(crate) on_connect: Option<OnConnectCallback>,

    /// Called when a feed connection is closed (by either side).
    pub(crate) on_disconnect: Option<OnDisconnectCallback>,

    /// Called when a dial or session error occurs.
    pub(crate) on_error: Option<OnErrorCallback>,

    /// Called for every raw frame received from the feed (debug/tracing).
    pub(crate) on_receive: Option<OnReceiveCallback>,

    /// Called for every raw frame sent to the feed (debug/tracing).
    pub(crate) on_send: Option<OnSendCallback>,
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("on_connect", &self.on_connect.is_some())
            .field("on_disconnect", &self.on_disconnect.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_receive", &self.on_receive.is_some())
            .field("on_send", &self.on_send.is_some())
            .finish()
    }
}

impl EventHandlers {
    /// Create a new empty `EventHandlers` (no callbacks registered).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked each time a feed connection is established.
    ///
    /// Fires on the initial connection and again after every successful
    /// reconnect.
    ///
    /// # Example
    /// ```rust
    /// use feedlink::EventHandlers;
    ///
    /// let handlers = EventHandlers::new()
    ///     .on_connect(|| println!("Connected!"));
    /// ```
    pub fn on_connect(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_connect = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked when a feed connection is closed.
    ///
    /// The callback receives a [`DisconnectReason`] with details about why
    /// the connection closed. A disconnect does not end the subscription;
    /// the supervisor reconnects unless it was cancelled.
    ///
    /// # Example
    /// ```rust
    /// use feedlink::EventHandlers;
    ///
    /// let handlers = EventHandlers::new()
    ///     .on_disconnect(|reason| println!("Disconnected: {}", reason));
    /// ```
    pub fn on_disconnect(mut self, f: impl Fn(DisconnectReason) + Send + Sync + 'static) -> Self {
        self.on_disconnect = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked when a dial or session error occurs.
    ///
    /// The callback receives a [`ConnectionError`] indicating whether the
    /// supervisor will keep retrying. The fatal error that ends the
    /// subscription is returned from `subscribe`, not reported here.
    ///
    /// # Example
    /// ```rust
    /// use feedlink::EventHandlers;
    ///
    /// let handlers = EventHandlers::new()
    ///     .on_error(|err| eprintln!("Error (recoverable={}): {}", err.recoverable, err));
    /// ```
    pub fn on_error(mut self, f: impl Fn(ConnectionError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked for every raw frame received from the feed.
    ///
    /// This is a **debug/tracing hook**. It receives the raw JSON text of
    /// every inbound frame before decoding. Not needed for normal operation;
    /// decoded messages arrive on the subscription's sink.
    ///
    /// # Example
    /// ```rust
    /// use feedlink::EventHandlers;
    ///
    /// let handlers = EventHandlers::new()
    ///     .on_receive(|msg| println!("[RECV] {}", msg));
    /// ```
    pub fn on_receive(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_receive = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked for every raw frame sent to the feed.
    ///
    /// This is a **debug/tracing hook**. The only outbound frame in normal
    /// operation is the subscribe handshake.
    ///
    /// # Example
    /// ```rust
    /// use feedlink::EventHandlers;
    ///
    /// let handlers = EventHandlers::new()
    ///     .on_send(|msg| println!("[SEND] {}", msg));
    /// ```
    pub fn on_send(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_send = Some(Arc::new(f));
        self
    }

    /// Returns `true` if any handler is registered.
    pub fn has_any(&self) -> bool {
        self.on_connect.is_some()
            || self.on_disconnect.is_some()
            || self.on_error.is_some()
            || self.on_receive.is_some()
            || self.on_send.is_some()
    }

    // ---------------------------------------------------------------
    // Internal dispatch helpers
    // ---------------------------------------------------------------

    /// Dispatch the on_connect event.
    pub(crate) fn emit_connect(&self) {
        if let Some(cb) = &self.on_connect {
            cb();
        }
    }

    /// Dispatch the on_disconnect event.
    pub(crate) fn emit_disconnect(&self, reason: DisconnectReason) {
        if let Some(cb) = &self.on_disconnect {
            cb(reason);
        }
    }

    /// Dispatch the on_error event.
    pub(crate) fn emit_error(&self, error: ConnectionError) {
        if let Some(cb) = &self.on_error {
            cb(error);
        }
    }

    /// Dispatch the on_receive event.
    pub(crate) fn emit_receive(&self, raw: &str) {
        if let Some(cb) = &self.on_receive {
            cb(raw);
        }
    }

    /// Dispatch the on_send event.
    pub(crate) fn emit_send(&self, raw: &str) {
        if let Some(cb) = &self.on_send {
            cb(raw);
        }
    }
}
