//! Main feed client with builder pattern.
//!
//! Provides the primary interface for subscribing to a feed endpoint.

use crate::auth::{HmacSigner, SignatureProvider};
use crate::credentials::FeedCredentials;
use crate::error::{FeedError, Result};
use crate::event_handlers::EventHandlers;
use crate::models::FeedMessage;
use crate::supervisor::ConnectionSupervisor;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Main feed client.
///
/// Use [`FeedClientBuilder`] to construct instances with custom configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use feedlink::{CancellationToken, FeedClient};
/// use tokio::sync::mpsc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FeedClient::builder()
///     .url("wss://feed.example.com")
///     .build()?;
///
/// let (tx, mut rx) = mpsc::channel(64);
/// let cancel = CancellationToken::new();
///
/// let worker = tokio::spawn({
///     let client = client.clone();
///     let cancel = cancel.clone();
///     async move { client.subscribe(tx, cancel, vec!["BTC-USD".to_string()]).await }
/// });
///
/// while let Some(message) = rx.recv().await {
///     println!("{:?}", message.message_type());
/// }
///
/// cancel.cancel();
/// worker.await??;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FeedClient {
    url: String,
    credentials: Option<FeedCredentials>,
    signer: Arc<dyn SignatureProvider>,
    handlers: EventHandlers,
}

impl FeedClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> FeedClientBuilder {
        FeedClientBuilder::new()
    }

    /// Subscribe to the given product feeds, relaying every received message
    /// to `sink` in receipt order.
    ///
    /// Runs until shutdown, reconnecting through connection losses. Returns
    /// `Ok(())` when `cancel` is triggered (or the sink's receiver is
    /// dropped) and `Err` when dialing fails
    /// [`MAX_CONSECUTIVE_DIAL_FAILURES`](crate::supervisor::MAX_CONSECUTIVE_DIAL_FAILURES)
    /// times in a row.
    ///
    /// Messages missed while reconnecting are not replayed.
    pub async fn subscribe(
        &self,
        sink: mpsc::Sender<FeedMessage>,
        cancel: CancellationToken,
        topics: Vec<String>,
    ) -> Result<()> {
        let supervisor = ConnectionSupervisor::new(
            self.url.clone(),
            self.credentials.clone(),
            self.signer.clone(),
            self.handlers.clone(),
        );
        supervisor.run(sink, cancel, topics).await
    }

    /// The configured feed endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Builder for [`FeedClient`].
pub struct FeedClientBuilder {
    url: Option<String>,
    credentials: Option<FeedCredentials>,
    signer: Arc<dyn SignatureProvider>,
    handlers: EventHandlers,
}

impl FeedClientBuilder {
    fn new() -> Self {
        Self {
            url: None,
            credentials: None,
            signer: Arc::new(HmacSigner::new()),
            handlers: EventHandlers::new(),
        }
    }

    /// Set the feed endpoint URL
    ///
    /// `http(s)://` URLs are converted to `ws(s)://` when dialing.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set API credentials for authenticated subscriptions
    ///
    /// Credentials with any empty field are ignored and the subscribe
    /// request is sent unauthenticated.
    pub fn credentials(mut self, credentials: FeedCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replace the default HMAC-SHA256 signer
    pub fn signer(mut self, signer: Arc<dyn SignatureProvider>) -> Self {
        self.signer = signer;
        self
    }

    /// Set connection lifecycle event handlers
    pub fn event_handlers(mut self, handlers: EventHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<FeedClient> {
        let url = self
            .url
            .ok_or_else(|| FeedError::ConfigurationError("url is required".into()))?;

        Ok(FeedClient {
            url,
            credentials: self.credentials,
            signer: self.signer,
            handlers: self.handlers,
        })
    }
}
