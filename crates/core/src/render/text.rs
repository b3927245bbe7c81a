//! Text rendering for the standard report and warnings views
//!
//! The standard report is a single-pass composition over an immutable
//! [`Report`]: every block is an independent gate that either prints its
//! lines or is omitted entirely. No block's presence affects another's.

use std::io::Write;

use owo_colors::{OwoColorize, Style};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::models::Process;
use crate::render::{print_row, print_row_raw, Theme, LABEL_WIDTH};
use crate::report::Report;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// At most this many file descriptors are listed before eliding the rest
const FD_LIST_LIMIT: usize = 10;

/// Render the full standard report
///
/// `now` is an explicit input rather than read inside, so two renders of
/// the same report at the same instant are byte-identical.
pub fn render_standard(
    out: &mut impl Write,
    report: &Report,
    theme: &Theme,
    verbose: bool,
    now: OffsetDateTime,
) {
    let target = report
        .target()
        .map(|p| p.command.as_str())
        .unwrap_or("unknown");
    print_row(out, "Target", target, theme.info, Style::new());
    writeln!(out).ok();

    let Some(proc) = report.target() else {
        return;
    };

    // Process identity with optional health and fork tags
    let mut process_value = format!(
        "{} ({})",
        proc.command,
        format!("pid {}", proc.pid).style(theme.emphasis)
    );
    if let Some(health) = proc.health.as_deref() {
        if !health.is_empty() && health != "healthy" {
            process_value.push(' ');
            process_value.push_str(&format!("[{health}]").style(theme.alert).to_string());
        }
    }
    if proc.forked.as_deref() == Some("forked") {
        process_value.push(' ');
        process_value.push_str(&"{forked}".style(theme.muted).to_string());
    }
    print_row_raw(out, "Process", &process_value, theme.info);

    if let Some(user) = nonempty(&proc.user) {
        if user != "unknown" {
            print_row(out, "User", user, theme.accent, Style::new());
        }
    }

    if let Some(container) = nonempty(&proc.container) {
        print_row(out, "Container", container, theme.info, Style::new());
    }
    if let Some(service) = nonempty(&proc.service) {
        print_row(out, "Service", service, theme.info, Style::new());
    }

    let command = if proc.cmdline.is_empty() {
        &proc.command
    } else {
        &proc.cmdline
    };
    print_row(out, "Command", command, theme.success, Style::new());

    let started = format!(
        "{} ({})",
        format_relative_time(proc.started_at, now),
        format_absolute_time(proc.started_at)
    );
    print_row(out, "Started", &started, theme.highlight, Style::new());

    if report.restart_count > 0 {
        print_row(
            out,
            "Restarts",
            &report.restart_count.to_string(),
            theme.muted,
            Style::new(),
        );
    }

    // Causal chain, root to target
    writeln!(out).ok();
    writeln!(out, "{} :", "Why It Exists".style(theme.highlight)).ok();
    let chain: Vec<String> = report
        .ancestry
        .iter()
        .map(|p| {
            format!(
                "{} ({})",
                p.display_name(),
                format!("pid {}", p.pid).style(theme.emphasis)
            )
        })
        .collect();
    let arrow = format!(" {} ", "→".style(theme.highlight));
    writeln!(out, "  {}", chain.join(&arrow)).ok();
    writeln!(out).ok();

    let kind = report.source.kind.as_str();
    let source_value = match report.source.name.as_deref() {
        Some(name) if !name.is_empty() && name != kind => format!("{name} ({kind})"),
        _ => kind.to_string(),
    };
    print_row(out, "Source", &source_value, theme.accent, Style::new());

    if let Some(dir) = nonempty(&proc.working_dir) {
        writeln!(out).ok();
        print_row(out, "Working Dir", dir, theme.success, Style::new());
    }
    if let Some(repo) = nonempty(&proc.git_repo) {
        let value = match nonempty(&proc.git_branch) {
            Some(branch) => format!("{repo} ({branch})"),
            None => repo.to_string(),
        };
        print_row(out, "Git Repo", &value, theme.accent, Style::new());
    }

    // Listening addresses; a port/address length mismatch suppresses the
    // whole block rather than guessing at pairings
    if !proc.listening_ports.is_empty()
        && proc.listening_ports.len() == proc.bind_addresses.len()
    {
        let mut first = true;
        for (addr, port) in proc.bind_addresses.iter().zip(&proc.listening_ports) {
            if addr.is_empty() || *port == 0 {
                continue;
            }
            if first {
                print_row(
                    out,
                    "Listening",
                    &format!("{addr}:{port}"),
                    theme.success,
                    Style::new(),
                );
                first = false;
            } else {
                writeln!(out, "{:width$}{addr}:{port}", "", width = LABEL_WIDTH + 2).ok();
            }
        }
    }

    if report.has_warnings() {
        writeln!(out).ok();
        writeln!(
            out,
            "{}:",
            format!("{:<width$}", "Warnings", width = LABEL_WIDTH).style(theme.alert)
        )
        .ok();
        for warning in &report.warnings {
            writeln!(out, "  • {warning}").ok();
        }
    }

    if verbose {
        render_extended(out, proc, theme);
    }
}

/// Verbose-only block: memory, I/O, file descriptors, process details
fn render_extended(out: &mut impl Write, proc: &Process, theme: &Theme) {
    writeln!(out).ok();
    writeln!(out, "{}:", "Extended Information".style(theme.highlight)).ok();

    if proc.memory.vms > 0 {
        writeln!(out).ok();
        writeln!(out, "{}:", "Memory".style(theme.success)).ok();
        writeln!(out, "  Virtual: {:.1} MB", proc.memory.vms_mb).ok();
        writeln!(out, "  Resident: {:.1} MB", proc.memory.rss_mb).ok();
        if proc.memory.shared > 0 {
            writeln!(
                out,
                "  Shared: {:.1} MB",
                proc.memory.shared as f64 / BYTES_PER_MB
            )
            .ok();
        }
    }

    if proc.io.read_bytes > 0 || proc.io.write_bytes > 0 {
        writeln!(out).ok();
        writeln!(out, "{}:", "I/O Statistics".style(theme.success)).ok();
        if proc.io.read_bytes > 0 {
            writeln!(
                out,
                "  Read: {:.1} MB ({} ops)",
                proc.io.read_bytes as f64 / BYTES_PER_MB,
                proc.io.read_ops
            )
            .ok();
        }
        if proc.io.write_bytes > 0 {
            writeln!(
                out,
                "  Write: {:.1} MB ({} ops)",
                proc.io.write_bytes as f64 / BYTES_PER_MB,
                proc.io.write_ops
            )
            .ok();
        }
    }

    if proc.fd_count > 0 {
        writeln!(out).ok();
        writeln!(
            out,
            "{}: {}/{}",
            "File Descriptors".style(theme.success),
            proc.fd_count,
            proc.fd_limit
        )
        .ok();
        if (1..=FD_LIST_LIMIT).contains(&proc.file_descs.len()) {
            for fd in &proc.file_descs {
                writeln!(out, "  {fd}").ok();
            }
        } else if proc.file_descs.len() > FD_LIST_LIMIT {
            writeln!(
                out,
                "  Showing first {} of {} descriptors:",
                FD_LIST_LIMIT,
                proc.file_descs.len()
            )
            .ok();
            for fd in &proc.file_descs[..FD_LIST_LIMIT] {
                writeln!(out, "  {fd}").ok();
            }
            writeln!(out, "  ... and {} more", proc.file_descs.len() - FD_LIST_LIMIT).ok();
        }
    }

    if proc.thread_count > 1 || !proc.children.is_empty() {
        writeln!(out).ok();
        writeln!(out, "{}:", "Process Details".style(theme.success)).ok();
        if proc.thread_count > 1 {
            writeln!(out, "  Threads: {}", proc.thread_count).ok();
        }
        if !proc.children.is_empty() {
            writeln!(out, "  Children: {:?}", proc.children).ok();
        }
    }
}

/// Render only the warnings, or an all-clear line
pub fn render_warnings(out: &mut impl Write, warnings: &[String], theme: &Theme) {
    if warnings.is_empty() {
        writeln!(out, "{}", "No warnings.".style(theme.success)).ok();
        return;
    }
    writeln!(out, "{}:", "Warnings".style(theme.alert)).ok();
    for warning in warnings {
        writeln!(out, "  • {warning}").ok();
    }
}

/// Relative phrase for how long ago a process started
///
/// Buckets coarsen with age: minutes under an hour, then "1 hour ago"
/// until two hours, whole hours until a day, "1 day ago" until 48 hours,
/// whole days beyond that.
pub fn format_relative_time(started_at: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed = now - started_at;
    let hours = elapsed.whole_hours();
    let minutes = elapsed.whole_minutes();

    if hours >= 48 {
        format!("{} days ago", hours / 24)
    } else if hours >= 24 {
        "1 day ago".to_string()
    } else if hours >= 2 {
        format!("{hours} hours ago")
    } else if minutes >= 60 {
        "1 hour ago".to_string()
    } else if minutes > 0 {
        format!("{minutes} min ago")
    } else {
        "just now".to_string()
    }
}

/// Absolute timestamp as `Mon 2025-02-02 11:42:10 +05:30`
pub fn format_absolute_time(dt: OffsetDateTime) -> String {
    let format = format_description!(
        "[weekday repr:short] [year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
    );
    dt.format(format).unwrap_or_else(|_| dt.to_string())
}

/// Helper for Option<String> fields where empty means unset
fn nonempty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IoStats, MemoryStats, Process, Source};
    use crate::render::strip_escapes;
    use time::macros::datetime;
    use time::Duration;

    const NOW: OffsetDateTime = datetime!(2025-03-12 08:00:00 UTC);

    fn sample_process(pid: i32, command: &str) -> Process {
        Process {
            pid,
            command: command.to_string(),
            cmdline: String::new(),
            user: None,
            container: None,
            service: None,
            health: None,
            forked: None,
            started_at: datetime!(2025-03-10 08:00:00 UTC),
            working_dir: None,
            git_repo: None,
            git_branch: None,
            listening_ports: Vec::new(),
            bind_addresses: Vec::new(),
            memory: MemoryStats::default(),
            io: IoStats::default(),
            fd_count: 0,
            fd_limit: 0,
            file_descs: Vec::new(),
            thread_count: 0,
            children: Vec::new(),
            env: Vec::new(),
        }
    }

    fn sample_report() -> Report {
        let mut target = sample_process(4321, "postgres");
        target.cmdline = "/usr/bin/postgres -D /var/lib/postgres".to_string();
        target.user = Some("postgres".to_string());
        Report {
            ancestry: vec![sample_process(1, "systemd"), target],
            restart_count: 0,
            source: Source {
                kind: "systemd service".to_string(),
                name: Some("postgresql".to_string()),
            },
            warnings: Vec::new(),
        }
    }

    fn render_plain(report: &Report, verbose: bool) -> String {
        let mut out = Vec::new();
        render_standard(&mut out, report, &Theme::new(false), verbose, NOW);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn relative_time_buckets() {
        let at = |d: Duration| format_relative_time(NOW - d, NOW);
        assert_eq!(at(Duration::ZERO), "just now");
        assert_eq!(at(Duration::seconds(45)), "just now");
        assert_eq!(at(Duration::minutes(30)), "30 min ago");
        assert_eq!(at(Duration::minutes(59)), "59 min ago");
        assert_eq!(at(Duration::minutes(90)), "1 hour ago");
        assert_eq!(at(Duration::hours(3)), "3 hours ago");
        assert_eq!(at(Duration::hours(47) + Duration::minutes(59)), "1 day ago");
        assert_eq!(at(Duration::hours(48)), "2 days ago");
        assert_eq!(at(Duration::hours(49)), "2 days ago");
    }

    #[test]
    fn absolute_time_format() {
        let dt = datetime!(2025-02-02 11:42:10 +05:30);
        assert_eq!(format_absolute_time(dt), "Sun 2025-02-02 11:42:10 +05:30");
        let utc = datetime!(2025-03-10 08:00:00 UTC);
        assert_eq!(format_absolute_time(utc), "Mon 2025-03-10 08:00:00 +00:00");
    }

    #[test]
    fn standard_report_basics() {
        let text = render_plain(&sample_report(), false);
        assert!(text.starts_with("Target      : postgres\n\n"));
        assert!(text.contains("Process     : postgres (pid 4321)\n"));
        assert!(text.contains("User        : postgres\n"));
        assert!(text.contains("Command     : /usr/bin/postgres -D /var/lib/postgres\n"));
        assert!(text.contains("Started     : 2 days ago (Mon 2025-03-10 08:00:00 +00:00)\n"));
        assert!(text.contains("Why It Exists :\n  systemd (pid 1) → postgres (pid 4321)\n"));
        assert!(text.contains("Source      : postgresql (systemd service)\n"));
    }

    #[test]
    fn command_falls_back_to_short_name() {
        let mut report = sample_report();
        report.ancestry[1].cmdline.clear();
        let text = render_plain(&report, false);
        assert!(text.contains("Command     : postgres\n"));
    }

    #[test]
    fn chain_falls_back_to_cmdline_for_unnamed_process() {
        let mut report = sample_report();
        report.ancestry[0].command.clear();
        report.ancestry[0].cmdline = "/sbin/init".to_string();
        let text = render_plain(&report, false);
        assert!(text.contains("  /sbin/init (pid 1) → postgres (pid 4321)\n"));
    }

    #[test]
    fn health_and_fork_tags() {
        let mut report = sample_report();
        report.ancestry[1].health = Some("degraded".to_string());
        report.ancestry[1].forked = Some("forked".to_string());
        let text = render_plain(&report, false);
        assert!(text.contains("Process     : postgres (pid 4321) [degraded] {forked}\n"));
    }

    #[test]
    fn healthy_status_is_quiet() {
        let mut report = sample_report();
        report.ancestry[1].health = Some("healthy".to_string());
        let text = render_plain(&report, false);
        assert!(!text.contains("[healthy]"));
        assert!(text.contains("Process     : postgres (pid 4321)\n"));
    }

    #[test]
    fn unknown_user_is_omitted() {
        let mut report = sample_report();
        report.ancestry[1].user = Some("unknown".to_string());
        let text = render_plain(&report, false);
        assert!(!text.contains("User"));
    }

    #[test]
    fn container_and_service_lines() {
        let mut report = sample_report();
        report.ancestry[1].container = Some("db-1".to_string());
        report.ancestry[1].service = Some("postgresql.service".to_string());
        let text = render_plain(&report, false);
        assert!(text.contains("Container   : db-1\n"));
        assert!(text.contains("Service     : postgresql.service\n"));
    }

    #[test]
    fn source_without_distinct_name_shows_kind_only() {
        let mut report = sample_report();
        report.ancestry[1].user = None;
        report.source = Source {
            kind: "shell".to_string(),
            name: Some("shell".to_string()),
        };
        let text = render_plain(&report, false);
        assert!(text.contains("Source      : shell\n"));
    }

    #[test]
    fn restart_count_gate() {
        let mut report = sample_report();
        assert!(!render_plain(&report, false).contains("Restarts"));
        report.restart_count = 3;
        assert!(render_plain(&report, false).contains("Restarts    : 3\n"));
    }

    #[test]
    fn git_context_with_branch() {
        let mut report = sample_report();
        report.ancestry[1].working_dir = Some("/srv/app".to_string());
        report.ancestry[1].git_repo = Some("/srv/app".to_string());
        report.ancestry[1].git_branch = Some("main".to_string());
        let text = render_plain(&report, false);
        assert!(text.contains("Working Dir : /srv/app\n"));
        assert!(text.contains("Git Repo    : /srv/app (main)\n"));
    }

    #[test]
    fn listening_block_requires_matching_lengths() {
        let mut report = sample_report();
        report.ancestry[1].listening_ports = vec![5432, 5433];
        report.ancestry[1].bind_addresses = vec!["127.0.0.1".to_string()];
        let text = render_plain(&report, false);
        assert!(!text.contains("Listening"));
    }

    #[test]
    fn listening_block_labels_first_qualifying_entry() {
        let mut report = sample_report();
        report.ancestry[1].listening_ports = vec![0, 5432, 5433];
        report.ancestry[1].bind_addresses = vec![
            "127.0.0.1".to_string(),
            "0.0.0.0".to_string(),
            "::1".to_string(),
        ];
        let text = render_plain(&report, false);
        assert!(text.contains("Listening   : 0.0.0.0:5432\n              ::1:5433\n"));
    }

    #[test]
    fn warnings_block_preserves_order() {
        let mut report = sample_report();
        report.warnings = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        let text = render_plain(&report, false);
        assert!(text.contains("Warnings    :\n  • b\n  • a\n  • b\n"));
    }

    #[test]
    fn extended_block_only_when_verbose() {
        let mut report = sample_report();
        report.ancestry[1].memory = MemoryStats {
            vms: 200 * 1024 * 1024,
            rss: 50 * 1024 * 1024,
            shared: 8 * 1024 * 1024,
            vms_mb: 200.0,
            rss_mb: 50.0,
        };
        assert!(!render_plain(&report, false).contains("Extended Information"));
        let text = render_plain(&report, true);
        assert!(text.contains("Extended Information:\n"));
        assert!(text.contains("Memory:\n  Virtual: 200.0 MB\n  Resident: 50.0 MB\n  Shared: 8.0 MB\n"));
    }

    #[test]
    fn io_block_skips_zero_directions() {
        let mut report = sample_report();
        report.ancestry[1].io = IoStats {
            read_bytes: 3 * 1024 * 1024,
            write_bytes: 0,
            read_ops: 42,
            write_ops: 0,
        };
        let text = render_plain(&report, true);
        assert!(text.contains("I/O Statistics:\n  Read: 3.0 MB (42 ops)\n"));
        assert!(!text.contains("Write:"));
    }

    #[test]
    fn descriptor_list_elides_after_ten() {
        let mut report = sample_report();
        report.ancestry[1].fd_count = 12;
        report.ancestry[1].fd_limit = 1024;
        report.ancestry[1].file_descs = (0..12).map(|i| format!("desc-{i:02}")).collect();
        let text = render_plain(&report, true);
        assert!(text.contains("File Descriptors: 12/1024\n"));
        assert!(text.contains("Showing first 10 of 12 descriptors:\n"));
        assert!(text.contains("  desc-09\n"));
        assert!(!text.contains("desc-10"));
        assert!(text.contains("  ... and 2 more\n"));
    }

    #[test]
    fn descriptor_list_shows_all_when_few() {
        let mut report = sample_report();
        report.ancestry[1].fd_count = 3;
        report.ancestry[1].fd_limit = 1024;
        report.ancestry[1].file_descs =
            vec!["0:/dev/null".to_string(), "1:/var/log/app.log".to_string()];
        let text = render_plain(&report, true);
        assert!(text.contains("  0:/dev/null\n  1:/var/log/app.log\n"));
        assert!(!text.contains("Showing first"));
    }

    #[test]
    fn process_details_gate() {
        let mut report = sample_report();
        report.ancestry[1].thread_count = 1;
        assert!(!render_plain(&report, true).contains("Process Details"));
        report.ancestry[1].thread_count = 8;
        report.ancestry[1].children = vec![100, 101];
        let text = render_plain(&report, true);
        assert!(text.contains("Process Details:\n  Threads: 8\n  Children: [100, 101]\n"));
    }

    #[test]
    fn empty_ancestry_falls_back_to_unknown_target() {
        let report = Report {
            ancestry: Vec::new(),
            restart_count: 0,
            source: Source::unknown(),
            warnings: Vec::new(),
        };
        let text = render_plain(&report, true);
        assert_eq!(text, "Target      : unknown\n\n");
    }

    #[test]
    fn render_is_deterministic_for_frozen_now() {
        let mut report = sample_report();
        report.warnings.push("parent exited".to_string());
        let first = render_plain(&report, true);
        let second = render_plain(&report, true);
        assert_eq!(first, second);
    }

    #[test]
    fn colored_output_matches_plain_content() {
        let report = sample_report();
        let mut out = Vec::new();
        render_standard(&mut out, &report, &Theme::new(true), true, NOW);
        let colored = String::from_utf8(out).unwrap();
        assert!(colored.contains('\u{1b}'));
        assert_eq!(strip_escapes(&colored), render_plain(&report, true));
    }

    #[test]
    fn warnings_view_all_clear() {
        let mut out = Vec::new();
        render_warnings(&mut out, &[], &Theme::new(false));
        assert_eq!(String::from_utf8(out).unwrap(), "No warnings.\n");
    }

    #[test]
    fn warnings_view_bullets_in_order() {
        let warnings = vec![
            "running as root".to_string(),
            "fd usage above 90%".to_string(),
        ];
        let mut out = Vec::new();
        render_warnings(&mut out, &warnings, &Theme::new(false));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Warnings:\n  • running as root\n  • fd usage above 90%\n"
        );
    }
}
