//! Connection supervision and reconnect policy.
//!
//! The supervisor owns the dial/retry loop: it establishes connections, hands
//! each one to a subscription session, and decides after every failure
//! whether to retry or give up. Only consecutive dial failures are bounded;
//! session failures on successfully established connections reconnect
//! immediately, with no backoff and no effect on the dial counter, so a
//! server that accepts connections but instantly fails sessions produces a
//! tight reconnect cycle. `on_error` is the operator's visibility into that.

use crate::auth::SignatureProvider;
use crate::credentials::FeedCredentials;
use crate::error::{FeedError, Result};
use crate::event_handlers::{ConnectionError, DisconnectReason, EventHandlers};
use crate::models::FeedMessage;
use crate::session;
use crate::transport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Consecutive dial failures after which the supervisor gives up and returns
/// the most recent dial error. A successful dial resets the count.
pub const MAX_CONSECUTIVE_DIAL_FAILURES: u32 = 5;

/// Delay before the next dial attempt after a non-fatal dial failure.
pub const DIAL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Owns the reconnect policy for one subscription.
///
/// Constructed by [`FeedClient::subscribe`](crate::FeedClient::subscribe);
/// one supervisor run corresponds to one `subscribe` call.
pub struct ConnectionSupervisor {
    url: String,
    credentials: Option<FeedCredentials>,
    signer: Arc<dyn SignatureProvider>,
    handlers: EventHandlers,
}

impl ConnectionSupervisor {
    pub(crate) fn new(
        url: String,
        credentials: Option<FeedCredentials>,
        signer: Arc<dyn SignatureProvider>,
        handlers: EventHandlers,
    ) -> Self {
        Self {
            url,
            credentials,
            signer,
            handlers,
        }
    }

    /// Run the subscription until cancelled or the dial-failure threshold is
    /// reached.
    ///
    /// `Ok(())` means clean shutdown: the token was cancelled, or the
    /// consumer dropped its receiver. `Err` carries the dial error that
    /// exhausted [`MAX_CONSECUTIVE_DIAL_FAILURES`]. Cancellation is observed
    /// at every phase: before dialing, during the retry delay, and while a
    /// session is streaming.
    pub async fn run(
        &self,
        sink: mpsc::Sender<FeedMessage>,
        cancel: CancellationToken,
        topics: Vec<String>,
    ) -> Result<()> {
        let mut dial_failures: u32 = 0;

        loop {
            let dialed = tokio::select! {
                biased;

                _ = cancel.cancelled() => return Ok(()),
                dialed = transport::dial(&self.url, self.handlers.clone()) => dialed,
            };

            let (transport, closer) = match dialed {
                Ok(pair) => pair,
                Err(e) => {
                    dial_failures += 1;
                    if dial_failures >= MAX_CONSECUTIVE_DIAL_FAILURES {
                        // The fatal error is surfaced to the caller, not
                        // logged or reported like the retried ones.
                        return Err(e);
                    }

                    log::error!("[feedlink] Failed to dial feed: {}", e);
                    self.handlers
                        .emit_error(ConnectionError::new(e.to_string(), true));

                    tokio::select! {
                        biased;

                        _ = cancel.cancelled() => return Ok(()),
                        _ = tokio::time::sleep(DIAL_RETRY_DELAY) => {}
                    }
                    continue;
                },
            };

            dial_failures = 0;
            self.handlers.emit_connect();

            let (outcome_tx, outcome_rx) = oneshot::channel();
            let session_sink = sink.clone();
            let session_topics = topics.clone();
            let credentials = self.credentials.clone();
            let signer = self.signer.clone();
            tokio::spawn(async move {
                let err = session::run_session(
                    transport,
                    session_sink,
                    session_topics,
                    credentials,
                    signer,
                )
                .await;
                let _ = outcome_tx.send(err);
            });

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    // Close the transport and return immediately. The session
                    // task is left behind to fail its blocked receive against
                    // the closed transport; its outcome is discarded and it
                    // can no longer reach the sink.
                    closer.close();
                    self.handlers.emit_disconnect(DisconnectReason::with_code(
                        "Subscription cancelled",
                        1000,
                    ));
                    return Ok(());
                }

                outcome = outcome_rx => {
                    match outcome {
                        Ok(FeedError::SinkClosed) => {
                            // The consumer is gone; the session has already
                            // dropped the connection.
                            log::debug!("[feedlink] Message sink closed, stopping subscription");
                            self.handlers.emit_disconnect(DisconnectReason::new(
                                "Message sink closed",
                            ));
                            return Ok(());
                        }
                        Ok(err) => {
                            log::warn!("[feedlink] Feed session error: {}", err);
                            self.handlers
                                .emit_error(ConnectionError::new(err.to_string(), true));
                            // Re-dial immediately; session failures have no
                            // backoff and do not touch the dial counter.
                        }
                        Err(_) => {
                            log::warn!(
                                "[feedlink] Feed session ended without reporting an outcome"
                            );
                        }
                    }
                }
            }
        }
    }
}
