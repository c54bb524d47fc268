//! The `Job`/`JobAlert` data model and the alert assembler.
//!
//! Field declaration order is the wire contract: downstream consumers read
//! `id, subject, sender, date, snippet, jobs[]` with each job serialized as
//! `title, company, location, url`. Absent company/location serialize as
//! `null`, never omitted.

use serde::{Deserialize, Serialize};

use crate::error::AlertError;
use crate::gmail::RawMessage;

/// A single job posting extracted from an alert email body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job title, always non-empty
    pub title: String,
    /// Company name, when parseable
    pub company: Option<String>,
    /// Job location, when parseable
    pub location: Option<String>,
    /// Canonical job-view URL with tracking parameters stripped
    pub url: String,
}

/// One parsed LinkedIn Job Alert email, immutable after assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAlert {
    /// Gmail message identifier
    pub id: String,
    /// Subject header, verbatim
    pub subject: String,
    /// From header, verbatim
    pub sender: String,
    /// Date header, verbatim
    pub date: String,
    /// Gmail snippet with zero-width characters removed
    pub snippet: String,
    /// Extracted jobs in body order; may be empty
    pub jobs: Vec<Job>,
}

impl JobAlert {
    /// Assemble an alert from Gmail message metadata and the extracted jobs.
    ///
    /// `Subject`, `From`, and `Date` headers are mandatory; a missing one is
    /// a fatal error for this message and the caller skips it.
    pub fn assemble(message: &RawMessage, jobs: Vec<Job>) -> Result<Self, AlertError> {
        let subject = required_header(message, "Subject")?;
        let sender = required_header(message, "From")?;
        let date = required_header(message, "Date")?;

        Ok(JobAlert {
            id: message.id.clone(),
            subject,
            sender,
            date,
            snippet: clean_snippet(&message.snippet),
            jobs,
        })
    }
}

fn required_header(message: &RawMessage, field: &'static str) -> Result<String, AlertError> {
    message
        .header(field)
        .map(|v| v.to_string())
        .ok_or_else(|| AlertError::MetadataMissing {
            message_id: message.id.clone(),
            field,
        })
}

/// Strip the zero-width and non-breaking characters Gmail leaves in snippets.
fn clean_snippet(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\u{034f}' | '\u{200b}' | '\u{200c}' | '\u{200d}' | '\u{00a0}'))
        .collect::<String>()
        .trim()
        .to_string()
}
