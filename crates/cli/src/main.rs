//! procwhy: CLI tool that explains why a process exists
//!
//! Collectors gather the process data and hand it over as a JSON report
//! document; this binary renders it for humans.
//!
//! Usage:
//!   procwhy report.json        # Render a collected report
//!   collector -p 1234 | procwhy  # Read the report from stdin
//!
//! Output modes:
//!   --json      Machine-readable JSON
//!   --env       Command line and environment only (secrets masked)
//!   --warnings  Warnings only
//!   (default)   Human-readable report

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use owo_colors::OwoColorize;
use procwhy_core::render::{self, Theme};
use procwhy_core::Report;
use thiserror::Error;
use time::OffsetDateTime;

/// Exit codes for scripting
mod exit_codes {
    pub const ERROR_GENERAL: i32 = 1;
    pub const ERROR_NOT_FOUND: i32 = 2;
    pub const ERROR_INVALID_INPUT: i32 = 4;
}

/// Configuration file support
mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::PathBuf;

    /// User configuration from ~/.procwhy/config.toml
    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct Config {
        /// Default output settings
        pub output: OutputConfig,
        /// Default flags
        pub defaults: DefaultFlags,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct OutputConfig {
        /// Disable colored output by default
        pub no_color: bool,
        /// Use JSON output by default
        pub json: bool,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct DefaultFlags {
        /// Always show extended information
        pub verbose: bool,
        /// Never redact sensitive environment variables
        pub show_secrets: bool,
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".procwhy").join("config.toml"))
    }

    /// Load configuration from file
    pub fn load_config() -> Config {
        let Some(path) = config_path() else {
            return Config::default();
        };

        if !path.exists() {
            return Config::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Config::default(),
        }
    }

    /// Generate a sample config file content
    pub fn sample_config() -> &'static str {
        r#"# procwhy configuration file
# Place this file at ~/.procwhy/config.toml

[output]
# Disable colored output
no_color = false
# Use JSON output by default
json = false

[defaults]
# Always show extended information
verbose = false
# Never redact sensitive environment variables
show_secrets = false
"#
    }
}

/// Failures while ingesting a report document
#[derive(Debug, Error)]
enum InputError {
    #[error("could not read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("could not read report from stdin: {0}")]
    Stdin(io::Error),
    #[error("invalid report document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("report contains no ancestry; nothing to render")]
    EmptyAncestry,
}

impl InputError {
    fn exit_code(&self) -> i32 {
        match self {
            InputError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                exit_codes::ERROR_NOT_FOUND
            }
            InputError::Read { .. } | InputError::Stdin(_) => exit_codes::ERROR_GENERAL,
            InputError::Parse(_) | InputError::EmptyAncestry => exit_codes::ERROR_INVALID_INPUT,
        }
    }
}

#[derive(Parser)]
#[command(name = "procwhy")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  procwhy report.json              Render a collected report
  procwhy report.json --verbose    Include memory, I/O and descriptor stats
  procwhy report.json --env        Show the environment with secrets masked
  procwhy report.json --env --show-secrets
  collector -p 1234 | procwhy      Read the report from stdin")]
struct Cli {
    /// Report document to render ("-" or omitted reads stdin)
    #[arg(value_name = "REPORT")]
    input: Option<PathBuf>,

    /// Output as JSON (for scripting and automation)
    #[arg(long, short = 'j', conflicts_with_all = ["env", "warnings"])]
    json: bool,

    /// Show only the command line and environment variables
    #[arg(long, short = 'e', conflicts_with_all = ["json", "warnings"])]
    env: bool,

    /// Show only the warnings
    #[arg(long, short = 'w', conflicts_with_all = ["json", "env"])]
    warnings: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Show extended information (memory, I/O, file descriptors)
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Display sensitive environment variables without redaction
    #[arg(long)]
    show_secrets: bool,

    /// Generate a sample config file at ~/.procwhy/config.toml
    #[arg(long)]
    init_config: bool,
}

fn main() {
    // Load configuration file
    let cfg = config::load_config();

    let mut cli = Cli::parse();

    // Apply config defaults (CLI flags override config)
    if !cli.no_color && cfg.output.no_color {
        cli.no_color = true;
    }
    if !cli.json && cfg.output.json {
        cli.json = true;
    }
    if !cli.verbose && cfg.defaults.verbose {
        cli.verbose = true;
    }
    if !cli.show_secrets && cfg.defaults.show_secrets {
        cli.show_secrets = true;
    }

    // Determine color mode
    let theme = Theme::new(!cli.no_color && supports_color());

    if cli.init_config {
        handle_init_config(&theme);
        return;
    }

    let report = match load_report(cli.input.as_deref()) {
        Ok(report) => report,
        Err(e) => {
            print_error(&theme, &e.to_string());
            std::process::exit(e.exit_code());
        }
    };

    render_report(&report, &cli, &theme);
}

/// Handle --init-config flag
fn handle_init_config(theme: &Theme) {
    let Some(path) = config::config_path() else {
        print_error(theme, "Could not determine home directory");
        std::process::exit(exit_codes::ERROR_GENERAL);
    };

    if path.exists() {
        eprintln!(
            "{} Config file already exists at: {}",
            "warning:".style(theme.muted),
            path.display()
        );
        return;
    }

    let result = path
        .parent()
        .map(std::fs::create_dir_all)
        .unwrap_or(Ok(()))
        .and_then(|_| std::fs::write(&path, config::sample_config()));

    match result {
        Ok(()) => {
            eprintln!(
                "{} Sample config written to: {}",
                "success:".style(theme.success),
                path.display()
            );
        }
        Err(e) => {
            print_error(theme, &format!("Failed to write config: {e}"));
            std::process::exit(exit_codes::ERROR_GENERAL);
        }
    }
}

/// Read and validate the report document from a file or stdin
fn load_report(input: Option<&Path>) -> Result<Report, InputError> {
    let data = match input {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::read_to_string(path).map_err(|source| InputError::Read {
                path: path.display().to_string(),
                source,
            })?
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(InputError::Stdin)?;
            buf
        }
    };

    let report: Report = serde_json::from_str(&data)?;
    if report.ancestry.is_empty() {
        return Err(InputError::EmptyAncestry);
    }
    Ok(report)
}

/// Route the report to the selected output mode
fn render_report(report: &Report, cli: &Cli, theme: &Theme) {
    if cli.json {
        match render::render_json_string(report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                print_error(theme, &format!("Failed to render JSON: {e}"));
                std::process::exit(exit_codes::ERROR_GENERAL);
            }
        }
        return;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.warnings {
        render::render_warnings(&mut out, &report.warnings, theme);
    } else if cli.env {
        // load_report guarantees a non-empty ancestry
        if let Some(target) = report.target() {
            render::render_env_only_with_redaction(&mut out, target, theme, !cli.show_secrets);
        }
    } else {
        render::render_standard(
            &mut out,
            report,
            theme,
            cli.verbose,
            OffsetDateTime::now_utc(),
        );
    }

    out.flush().ok();
}

/// Print an error message
fn print_error(theme: &Theme, message: &str) {
    eprintln!("{} {}", "error:".style(theme.alert), message);
}

/// Check if the terminal supports color
fn supports_color() -> bool {
    // Check for common NO_COLOR convention
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check for TERM
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    atty::is(atty::Stream::Stdout)
}
