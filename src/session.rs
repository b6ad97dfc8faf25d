//! Per-connection subscription session.
//!
//! A session owns one established transport for its whole life: it sends the
//! subscribe handshake, then relays inbound messages to the consumer's sink
//! until the transport fails. Reconnecting is the supervisor's job; the
//! session never dials.

use crate::auth::{self, SignatureProvider};
use crate::credentials::FeedCredentials;
use crate::error::{FeedError, Result};
use crate::models::{FeedMessage, FeedRequest};
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Build the subscribe handshake, signing it when credentials are configured.
///
/// Credentials with any empty field are treated as absent; the request is
/// either fully signed or carries no auth fields at all.
pub(crate) fn build_subscribe_request(
    topics: &[String],
    credentials: Option<&FeedCredentials>,
    signer: &dyn SignatureProvider,
) -> Result<FeedRequest> {
    let auth = match credentials {
        Some(creds) if creds.is_configured() => Some(auth::build_auth_fields(
            creds,
            signer,
            auth::unix_timestamp_string(),
        )?),
        _ => None,
    };

    Ok(match auth {
        Some(fields) => FeedRequest::subscribe_signed(topics.to_vec(), fields),
        None => FeedRequest::subscribe(topics.to_vec()),
    })
}

/// Run one subscription session over an established transport.
///
/// Always ends in an error; "no more messages" is indistinguishable from
/// connection failure at this layer. A signing failure is returned before
/// anything is sent on the connection.
pub(crate) async fn run_session<T: Transport>(
    mut transport: T,
    sink: mpsc::Sender<FeedMessage>,
    topics: Vec<String>,
    credentials: Option<FeedCredentials>,
    signer: Arc<dyn SignatureProvider>,
) -> FeedError {
    let request = match build_subscribe_request(&topics, credentials.as_ref(), signer.as_ref()) {
        Ok(request) => request,
        Err(e) => return e,
    };

    if let Err(e) = transport.send(&request).await {
        return e;
    }

    let shutdown = transport.shutdown_token();

    loop {
        let message = match transport.receive().await {
            Ok(message) => message,
            Err(e) => return e,
        };

        // Forward with blocking backpressure, raced against shutdown so a
        // cancelled subscription never delivers after subscribe has returned.
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                return FeedError::ReceiveError("connection closed".to_string());
            }

            sent = sink.send(message) => {
                if sent.is_err() {
                    return FeedError::SinkClosed;
                }
            }
        }
    }
}
