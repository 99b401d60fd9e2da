//! Log Redaction Layer
//!
//! Scrubs base64 image payloads and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static BASE64_BLOB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9+/]{64,}={0,2}").unwrap());
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts image payloads and credentials in a string.
pub fn redact_payload(input: &str) -> String {
    let redacted = BEARER_RE.replace_all(input, "[REDACTED_TOKEN]");
    BASE64_BLOB_RE
        .replace_all(&redacted, |caps: &regex::Captures| {
            format!("[REDACTED_BASE64 {} chars]", caps[0].len())
        })
        .into_owned()
}
