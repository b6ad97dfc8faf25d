//! API credentials for authenticated feed subscriptions.

use serde::{Deserialize, Serialize};

/// API credentials used to sign the subscribe request.
///
/// All three fields must be non-empty for authentication to be attempted;
/// otherwise the subscribe request is sent unauthenticated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedCredentials {
    /// API key identifier
    pub key: String,

    /// Base64-encoded API secret used as the HMAC signing key
    /// Note: Never logged or included in the subscribe request itself
    pub secret: String,

    /// API passphrase
    pub passphrase: String,
}

impl FeedCredentials {
    /// Create new credentials
    pub fn new(key: String, secret: String, passphrase: String) -> Self {
        Self {
            key,
            secret,
            passphrase,
        }
    }

    /// Whether authentication should be attempted.
    ///
    /// Returns true only when all three fields are non-empty. Partially
    /// populated credentials are treated as absent.
    pub fn is_configured(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty() && !self.passphrase.is_empty()
    }
}
