//! Environment rendering with credential redaction
//!
//! Classification is a name-pattern heuristic only: the key of each
//! `KEY=VALUE` entry is matched against a fixed pattern table, and values
//! are never scanned. Entries without `=` have nothing to hide and are
//! always passed through unchanged.

use std::io::Write;

use owo_colors::{OwoColorize, Style};

use crate::models::Process;
use crate::render::{print_row, Theme, LABEL_WIDTH};

/// Environment key patterns whose values may hold secrets.
///
/// Matched case-insensitively as substrings of the key, not whole words,
/// so e.g. `MY_API_TOKEN` and `sshpass` both trip the `TOKEN`/`PASS`-family
/// patterns they contain.
const SENSITIVE_PATTERNS: [&str; 16] = [
    "PASSWORD",
    "SECRET",
    "TOKEN",
    "KEY",
    "API_KEY",
    "PRIVATE_KEY",
    "AWS_SECRET",
    "AWS_ACCESS",
    "DATABASE_URL",
    "DB_PASSWORD",
    "CREDENTIAL",
    "AUTH",
    "PASSPHRASE",
    "CERTIFICATE",
    "SSL_CERT",
    "TLS_CERT",
];

/// Check whether an environment entry looks like it holds sensitive data.
///
/// Only the key is inspected: everything before the first `=`, or the
/// whole entry when there is none.
pub fn is_sensitive(entry: &str) -> bool {
    let Some(key) = entry.split('=').next() else {
        return false;
    };
    let key = key.to_uppercase();
    SENSITIVE_PATTERNS.iter().any(|p| key.contains(p))
}

/// Mask the value of a sensitive entry, keeping the key.
///
/// An entry without `=` is returned unchanged: a bare sensitive-looking
/// token carries no value to hide.
pub fn redact_env_var(entry: &str) -> String {
    match entry.split_once('=') {
        Some((key, _)) => format!("{key}=***REDACTED***"),
        None => entry.to_string(),
    }
}

/// Render the command line and environment with redaction enabled
pub fn render_env_only(out: &mut impl Write, process: &Process, theme: &Theme) {
    render_env_only_with_redaction(out, process, theme, true);
}

/// Render the command line and environment with optional redaction
pub fn render_env_only_with_redaction(
    out: &mut impl Write,
    process: &Process,
    theme: &Theme,
    redact_sensitive: bool,
) {
    print_row(out, "Command", &process.cmdline, theme.success, Style::new());

    if process.env.is_empty() {
        writeln!(
            out,
            "{}",
            "No environment variables found.".style(theme.alert)
        )
        .ok();
        return;
    }

    writeln!(
        out,
        "{}:",
        format!("{:<width$}", "Environment", width = LABEL_WIDTH).style(theme.info)
    )
    .ok();

    let mut redacted = 0usize;
    for entry in &process.env {
        if redact_sensitive && is_sensitive(entry) {
            writeln!(out, "  {}", redact_env_var(entry)).ok();
            redacted += 1;
        } else {
            writeln!(out, "  {entry}").ok();
        }
    }

    if redact_sensitive && redacted > 0 {
        writeln!(out).ok();
        writeln!(
            out,
            "{}",
            format!("[{redacted} sensitive environment variable(s) redacted]").style(theme.muted)
        )
        .ok();
        writeln!(
            out,
            "{}",
            "Use --show-secrets to display all variables.".style(theme.muted)
        )
        .ok();
    }
}
