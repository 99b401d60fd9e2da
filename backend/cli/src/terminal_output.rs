//! Terminal output: ANSI styling for notifications and key/value blocks.

use textsnap_client::{Notification, Severity};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// One notification line, styled by severity.
pub fn format_notification(notification: &Notification, color: bool) -> String {
    let msg = &notification.message;
    match (notification.severity, color) {
        (Severity::Info, true) => format!("{CYAN}{BOLD}ℹ{RESET} {msg}"),
        (Severity::Success, true) => format!("{GREEN}{BOLD}✓{RESET} {msg}"),
        (Severity::Error, true) => format!("{RED}{BOLD}✗{RESET} {msg}"),
        (Severity::Info, false) => format!("INFO: {msg}"),
        (Severity::Success, false) => format!("OK: {msg}"),
        (Severity::Error, false) => format!("ERROR: {msg}"),
    }
}

/// Errors go to stderr, everything else to stdout.
pub fn print_notification(notification: &Notification) {
    let line = format_notification(notification, supports_color());
    match notification.severity {
        Severity::Error => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

/// Render `key  value` rows with keys padded to a common width.
pub fn render_pairs(rows: &[(String, String)]) -> String {
    let width = rows
        .iter()
        .map(|(k, _)| strip_ansi(k).chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (key, value) in rows {
        let pad = width.saturating_sub(strip_ansi(key).chars().count());
        out.push_str(&format!("  {key}{}  {value}\n", " ".repeat(pad)));
    }
    out
}
