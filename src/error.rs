//! Error types for the feed client.

use thiserror::Error;

/// Errors produced while establishing or running a feed subscription.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Failed to establish the WebSocket connection.
    ///
    /// Retried with a fixed delay; becomes fatal after
    /// [`MAX_CONSECUTIVE_DIAL_FAILURES`](crate::supervisor::MAX_CONSECUTIVE_DIAL_FAILURES)
    /// dial attempts fail in a row. This is the only error
    /// [`subscribe`](crate::FeedClient::subscribe) ever returns.
    #[error("Failed to dial feed: {0}")]
    DialError(String),

    /// Signing the subscribe request failed.
    #[error("Failed to sign subscribe request: {0}")]
    SignatureError(String),

    /// Sending a message over an established connection failed.
    #[error("Failed to send on feed connection: {0}")]
    SendError(String),

    /// Receiving or decoding a message from an established connection failed.
    /// Also covers server-initiated close and end of stream.
    #[error("Feed connection closed: {0}")]
    ReceiveError(String),

    /// The consumer dropped its end of the message channel.
    #[error("Message sink closed by consumer")]
    SinkClosed,

    /// Client construction failed due to missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, FeedError>;
