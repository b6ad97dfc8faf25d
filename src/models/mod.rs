//! Data models for the feedlink client library.
//!
//! Defines the subscribe request sent over the wire and the opaque message
//! unit relayed from the feed to the consumer.

pub mod auth_fields;
pub mod feed_message;
pub mod feed_request;


pub use auth_fields::AuthFields;
pub use feed_message::FeedMessage;
pub use feed_request::FeedRequest;
