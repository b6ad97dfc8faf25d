//! # feedlink: Reconnecting Feed Subscriber
//!
//! A client library for maintaining a long-lived, authenticated subscription
//! to a streaming push-feed over WebSocket. Messages are relayed to the
//! consumer in receipt order; transient connection loss is ridden out with
//! bounded automatic reconnection.
//!
//! ## Features
//!
//! - **Automatic Reconnection**: Re-dials after connection loss; gives up only
//!   after five consecutive dial failures
//! - **Signed Handshakes**: HMAC-SHA256 request signing when API credentials
//!   are configured
//! - **Explicit Cancellation**: A [`CancellationToken`] stops the subscription
//!   cleanly from any task, at any phase
//! - **Lossless Relay**: Messages flow to a bounded channel with blocking
//!   backpressure, never reordered or dropped within a connection
//! - **Lifecycle Hooks**: Optional callbacks for connects, disconnects, and
//!   retried errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use feedlink::{CancellationToken, FeedClient};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FeedClient::builder()
//!         .url("wss://feed.example.com")
//!         .build()?;
//!
//!     let (tx, mut rx) = mpsc::channel(64);
//!     let cancel = CancellationToken::new();
//!
//!     let worker = tokio::spawn({
//!         let client = client.clone();
//!         let cancel = cancel.clone();
//!         async move { client.subscribe(tx, cancel, vec!["BTC-USD".to_string()]).await }
//!     });
//!
//!     while let Some(message) = rx.recv().await {
//!         println!("{}: {:?}", message.message_type().unwrap_or("?"), message);
//!     }
//!
//!     worker.await??;
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! ```rust,no_run
//! use feedlink::{FeedClient, FeedCredentials};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FeedClient::builder()
//!     .url("wss://feed.example.com")
//!     .credentials(FeedCredentials::new(
//!         "api-key".to_string(),
//!         "base64-secret".to_string(),
//!         "passphrase".to_string(),
//!     ))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! All three credential fields must be non-empty for the handshake to be
//! signed; otherwise the subscription is unauthenticated.

pub mod auth;
pub mod client;
pub mod credentials;
pub mod error;
pub mod event_handlers;
pub mod models;
mod session;
pub mod supervisor;
pub mod transport;

// Re-export main types for convenience
pub use auth::{HmacSigner, SignatureProvider};
pub use client::{FeedClient, FeedClientBuilder};
pub use credentials::FeedCredentials;
pub use error::{FeedError, Result};
pub use event_handlers::{ConnectionError, DisconnectReason, EventHandlers};
pub use models::{AuthFields, FeedMessage, FeedRequest};
pub use supervisor::{ConnectionSupervisor, DIAL_RETRY_DELAY, MAX_CONSECUTIVE_DIAL_FAILURES};
pub use tokio_util::sync::CancellationToken;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
