//! Subscribe-request signing for authenticated feeds.
//!
//! The feed authenticates subscriptions with an HMAC-SHA256 signature over a
//! canonical message derived from the request timestamp. The signing primitive
//! sits behind [`SignatureProvider`] so tests and alternative schemes can
//! substitute their own implementation.

use crate::credentials::FeedCredentials;
use crate::error::{FeedError, Result};
use crate::models::AuthFields;
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Method component of the canonical signature message.
const SIGNATURE_METHOD: &str = "GET";

/// Path component of the canonical signature message.
const SIGNATURE_PATH: &str = "/users/self";

/// Body component of the canonical signature message. The subscribe
/// handshake carries no body, so this is always empty.
const SIGNATURE_BODY: &str = "";

/// Produces an authentication signature over a canonical message.
///
/// Implementations must be cheap to call; signing happens on every
/// connect and reconnect.
pub trait SignatureProvider: Send + Sync {
    /// Sign `message` with `secret`, returning the encoded signature.
    fn sign(&self, secret: &str, message: &str) -> Result<String>;
}

/// Default signer: HMAC-SHA256 keyed with the base64-decoded secret,
/// returning the base64-encoded digest.
#[derive(Debug, Clone, Default)]
pub struct HmacSigner;

impl HmacSigner {
    /// Create a new HMAC signer
    pub fn new() -> Self {
        Self
    }
}

impl SignatureProvider for HmacSigner {
    fn sign(&self, secret: &str, message: &str) -> Result<String> {
        let key = general_purpose::STANDARD
            .decode(secret)
            .map_err(|e| FeedError::SignatureError(format!("Secret is not valid base64: {}", e)))?;

        let mut mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| FeedError::SignatureError(format!("Invalid HMAC key: {}", e)))?;
        mac.update(message.as_bytes());

        Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// Canonical message the feed verifies: timestamp, method, path, and body
/// concatenated with no separators.
pub(crate) fn signature_message(timestamp: &str) -> String {
    format!(
        "{}{}{}{}",
        timestamp, SIGNATURE_METHOD, SIGNATURE_PATH, SIGNATURE_BODY
    )
}

/// Current Unix time in whole seconds as a decimal string.
pub(crate) fn unix_timestamp_string() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}

/// Build the auth fields for a subscribe request signed at `timestamp`.
///
/// The timestamp is passed in rather than read here so callers control when
/// it is sampled and tests can pin it.
pub(crate) fn build_auth_fields(
    credentials: &FeedCredentials,
    signer: &dyn SignatureProvider,
    timestamp: String,
) -> Result<AuthFields> {
    let signature = signer.sign(&credentials.secret, &signature_message(&timestamp))?;

    Ok(AuthFields {
        signature,
        key: credentials.key.clone(),
        passphrase: credentials.passphrase.clone(),
        timestamp,
    })
}
