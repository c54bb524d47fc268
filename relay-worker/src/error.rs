//! Typed errors for per-message processing.
//!
//! Transport glue (Gmail HTTP, AMQP) uses `anyhow` with context; this module
//! only covers the errors the pipeline matches on to decide how a single
//! message is tallied.

use thiserror::Error;

/// Fatal-per-message errors. The batch logs them and moves on.
#[derive(Debug, Error)]
pub enum AlertError {
    /// A required Gmail metadata header was absent.
    #[error("message {message_id}: missing required header {field}")]
    MetadataMissing {
        message_id: String,
        field: &'static str,
    },
}
