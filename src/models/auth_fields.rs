use serde::{Deserialize, Serialize};

/// Authentication fields flattened into a signed subscribe request.
///
/// # JSON Wire Format
///
/// ```json
/// {
///   "type": "subscribe",
///   "product_ids": ["BTC-USD"],
///   "signature": "rDltJ2eEZQxW...",
///   "key": "my-api-key",
///   "passphrase": "my-passphrase",
///   "timestamp": "1700000000"
/// }
/// ```
///
/// Either all four fields are present or none are; partially populated
/// credentials never produce a partially authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthFields {
    /// Base64-encoded HMAC-SHA256 signature over the canonical request message
    pub signature: String,

    /// API key identifier
    pub key: String,

    /// API passphrase
    pub passphrase: String,

    /// Unix time in whole seconds at signing time, as a decimal string
    pub timestamp: String,
}
