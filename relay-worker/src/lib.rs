//! JobAlert Relay - Gmail to RabbitMQ bridge for LinkedIn Job Alert emails.
//!
//! This library provides the modules behind the `jobalert-relay` binary:
//! - `gmail`: thin Gmail REST API client (search + fetch)
//! - `decode`: MIME part tree to best-effort body text
//! - `extract`: job-listing extraction from decoded body text
//! - `alert`: the `Job`/`JobAlert` data model and assembler
//! - `queue`: RabbitMQ publisher for serialized alerts
//! - `pipeline`: the sequential fetch -> decode -> extract -> publish loop
//!
//! ## Architecture
//!
//! ```text
//! Gmail API → decode → extract → assemble → RabbitMQ queue
//! ```

pub mod alert;
pub mod config;
pub mod decode;
pub mod error;
pub mod extract;
pub mod gmail;
pub mod pipeline;
pub mod queue;

// Re-export commonly used types
pub use alert::{Job, JobAlert};
pub use config::Config;
pub use error::AlertError;
pub use gmail::{GmailClient, RawMessage};
pub use pipeline::BatchTally;
pub use queue::Publisher;
