//! Gmail collaborator: a thin client over the Gmail v1 REST API.
//!
//! The relay only reads: it searches for candidate messages and fetches each
//! one in `full` format to get headers, snippet, and the MIME part tree.
//! Token acquisition and refresh live outside this repository; the client is
//! handed a ready bearer token.

pub mod client;
pub mod types;

pub use client::GmailClient;
pub use types::{MessagePart, RawMessage};
