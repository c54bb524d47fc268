//! Job-Listing Extractor: decoded body text to an ordered list of jobs.
//!
//! LinkedIn job-alert bodies are semi-structured: each entry is a short block
//! with a title, usually a "Company · Location" line, and a job-view URL
//! (plain text `View job:` line or anchor href). The URL is the most
//! reliable anchor, so extraction starts from every job-view URL match and
//! associates nearby preceding text as title/company/location. The heuristic
//! is isolated in small pure functions with table-driven tests.

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::alert::Job;

/// Matches LinkedIn job-view URLs, tracking parameters included.
const JOB_URL_PATTERN: &str = r#"https://www\.linkedin\.com/[^\s<>"']*jobs/view/\d+[^\s<>"']*"#;

/// Separator line used between entries in plain-text alert bodies.
const SEPARATOR_RUN: usize = 20;

/// How many preceding lines are searched for title context.
const CONTEXT_WINDOW: usize = 5;

/// Extract all job postings from a decoded email body.
///
/// The output is ordered by first appearance in the body and deduplicated by
/// canonical URL (first occurrence wins). A URL with no associable title is
/// dropped; an empty result is a normal outcome.
pub fn extract_jobs(body: &str) -> Vec<Job> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    let url_re = Regex::new(JOB_URL_PATTERN).expect("Invalid job URL pattern");
    let lines: Vec<&str> = body.lines().collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut jobs = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        for m in url_re.find_iter(line) {
            let Some(url) = canonical_job_url(m.as_str()) else {
                debug!(raw = m.as_str(), "job_url_unparseable");
                continue;
            };

            if seen.contains(&url) {
                continue;
            }

            let context = context_fragments(&lines[..idx], &line[..m.start()], &url_re);
            let Some((title, company, location)) = associate_title(&context) else {
                debug!(url = %url, "job_url_without_title_dropped");
                continue;
            };

            seen.insert(url.clone());
            jobs.push(Job {
                title,
                company,
                location,
                url,
            });
        }
    }

    debug!(job_count = jobs.len(), "jobs_extracted");
    jobs
}

/// Canonicalize a matched job URL: strip the query string and fragment,
/// keeping the path segment that carries the job identifier.
fn canonical_job_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches(|c| matches!(c, '.' | ',' | ';' | ')' | ']'));
    let mut url = Url::parse(trimmed).ok()?;
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

/// Collect up to two usable text fragments preceding a URL match, closest
/// first. Walks backwards from any text on the URL's own line through prior
/// lines, stopping at entry separators and at lines carrying another job URL.
fn context_fragments(preceding: &[&str], same_line_prefix: &str, url_re: &Regex) -> Vec<String> {
    let mut fragments = Vec::new();

    if let Some(fragment) = usable_fragment(same_line_prefix) {
        fragments.push(fragment);
    }

    for line in preceding.iter().rev().take(CONTEXT_WINDOW) {
        if fragments.len() == 2 {
            break;
        }
        if is_separator_line(line) || url_re.is_match(line) {
            break;
        }
        if let Some(fragment) = usable_fragment(line) {
            fragments.push(fragment);
        }
    }

    fragments.truncate(2);
    fragments
}

/// Clean a candidate line into a usable fragment, or reject it.
///
/// `View job:` labels and bare URLs carry no title information.
fn usable_fragment(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        return None;
    }

    let lowered = trimmed.to_lowercase();
    if lowered == "view job" || lowered == "view job:" {
        return None;
    }

    Some(trimmed.to_string())
}

/// Whether a line is an entry separator (a run of dashes, as the plain-text
/// alert format uses between jobs).
fn is_separator_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= SEPARATOR_RUN && trimmed.chars().all(|c| c == '-')
}

/// Turn the collected context fragments into `(title, company, location)`.
///
/// When the nearest fragment reads like "Company · Location" and an earlier
/// fragment exists, the earlier fragment is the title; otherwise the nearest
/// fragment is the title and company/location stay unset.
fn associate_title(fragments: &[String]) -> Option<(String, Option<String>, Option<String>)> {
    let nearest = fragments.first()?;

    if fragments.len() > 1 && has_company_separator(nearest) {
        let (company, location) = split_company_location(nearest);
        return Some((fragments[1].clone(), Some(company), location));
    }

    Some((nearest.clone(), None, None))
}

/// Whether a fragment contains one of the separators LinkedIn uses between
/// company and location. Commas are deliberately excluded here: they are too
/// common in titles to mark a fragment as company metadata on their own.
fn has_company_separator(fragment: &str) -> bool {
    fragment.contains('·') || fragment.contains('•') || fragment.contains('|')
}

/// Split a "Company · Location" style fragment.
///
/// Tried separators, in order: middle-dot, bullet, pipe, comma. A separator
/// is used only when it appears exactly once with non-empty sides; when no
/// separator splits cleanly the whole fragment becomes the company.
pub fn split_company_location(fragment: &str) -> (String, Option<String>) {
    for sep in ['·', '•', '|', ','] {
        if fragment.matches(sep).count() == 1 {
            if let Some((company, location)) = fragment.split_once(sep) {
                let company = company.trim();
                let location = location.trim();
                if !company.is_empty() && !location.is_empty() {
                    return (company.to_string(), Some(location.to_string()));
                }
            }
        }
    }

    (fragment.trim().to_string(), None)
}
