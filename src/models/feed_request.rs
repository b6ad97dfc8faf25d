use serde::{Deserialize, Serialize};

use super::auth_fields::AuthFields;

/// Client-to-feed request messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedRequest {
    /// Subscribe to one or more product event streams
    ///
    /// Sent once, immediately after the connection is established. The feed
    /// replies with a confirmation followed by the event stream.
    ///
    /// When credentials are configured the authentication fields are
    /// flattened into the same object; an unauthenticated request carries
    /// only `type` and `product_ids`.
    Subscribe {
        /// Product identifiers to subscribe to
        product_ids: Vec<String>,

        /// Authentication fields, present only when credentials are configured
        #[serde(flatten)]
        auth: Option<AuthFields>,
    },
}

impl FeedRequest {
    /// Create an unauthenticated subscribe request
    pub fn subscribe(product_ids: Vec<String>) -> Self {
        Self::Subscribe {
            product_ids,
            auth: None,
        }
    }

    /// Create an authenticated subscribe request
    pub fn subscribe_signed(product_ids: Vec<String>, auth: AuthFields) -> Self {
        Self::Subscribe {
            product_ids,
            auth: Some(auth),
        }
    }
}
