//! Output rendering for reports
//!
//! All renderers write line-oriented text to a caller-supplied stream and
//! take a [`Theme`] resolved once per render call. With colors disabled the
//! theme styles are empty, so the emitted text differs only in the absence
//! of escape sequences, never in content.

pub mod env;
pub mod json;
pub mod text;

pub use env::{is_sensitive, redact_env_var, render_env_only, render_env_only_with_redaction};
pub use json::{render_json, render_json_compact, render_json_string};
pub use text::{format_absolute_time, format_relative_time, render_standard, render_warnings};

use std::io::Write;

use owo_colors::{OwoColorize, Style};

/// Label column width for aligned output
pub(crate) const LABEL_WIDTH: usize = 12;

/// Resolved display styles for one render pass
///
/// Roles are semantic; renderers never name concrete colors. Constructed
/// once per render call and shared read-only by every print site.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Whether color output is active
    pub enabled: bool,
    /// Red: warning headers, missing data
    pub alert: Style,
    /// Green: affirmative lines, command and context labels
    pub success: Style,
    /// Blue: primary identity labels
    pub info: Style,
    /// Cyan: secondary identity labels
    pub accent: Style,
    /// Magenta: section headers, the ancestry arrow
    pub highlight: Style,
    /// Dim: de-emphasized inline fragments such as pids
    pub emphasis: Style,
    /// Dim yellow: restart counts, fork tags, redaction notices
    pub muted: Style,
}

impl Theme {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                enabled: true,
                alert: Style::new().red(),
                success: Style::new().green(),
                info: Style::new().blue(),
                accent: Style::new().cyan(),
                highlight: Style::new().magenta(),
                emphasis: Style::new().dimmed(),
                muted: Style::new().dimmed().yellow(),
            }
        } else {
            Self {
                enabled: false,
                alert: Style::new(),
                success: Style::new(),
                info: Style::new(),
                accent: Style::new(),
                highlight: Style::new(),
                emphasis: Style::new(),
                muted: Style::new(),
            }
        }
    }
}

/// Print an aligned label with value
pub(crate) fn print_row(
    out: &mut impl Write,
    label: &str,
    value: &str,
    label_style: Style,
    value_style: Style,
) {
    writeln!(
        out,
        "{}: {}",
        format!("{:<width$}", label, width = LABEL_WIDTH).style(label_style),
        value.style(value_style)
    )
    .ok();
}

/// Print an aligned label with an already-styled value
pub(crate) fn print_row_raw(out: &mut impl Write, label: &str, value: &str, label_style: Style) {
    writeln!(
        out,
        "{}: {}",
        format!("{:<width$}", label, width = LABEL_WIDTH).style(label_style),
        value
    )
    .ok();
}

/// Drop ANSI SGR sequences, used by tests to compare colored and plain output
#[cfg(test)]
pub(crate) fn strip_escapes(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for e in chars.by_ref() {
                if e == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_theme_emits_no_escapes() {
        let theme = Theme::new(false);
        let mut out = Vec::new();
        print_row(&mut out, "User", "postgres", theme.accent, theme.info);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "User        : postgres\n");
    }

    #[test]
    fn enabled_theme_preserves_text_content() {
        let theme = Theme::new(true);
        let mut out = Vec::new();
        print_row(&mut out, "User", "postgres", theme.accent, theme.info);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\u{1b}'));
        assert_eq!(strip_escapes(&text), "User        : postgres\n");
    }
}
