//! Core domain models for procwhy
//!
//! These types are OS-agnostic and describe one analyzed process plus the
//! sampled resource data that collectors attach to it. The rendering layer
//! only reads them; nothing here is mutated after collection.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Virtual and resident memory usage for a process
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStats {
    /// Virtual memory size in bytes
    pub vms: u64,
    /// Resident set size in bytes
    pub rss: u64,
    /// Shared memory in bytes
    pub shared: u64,
    /// Virtual memory size in megabytes, precomputed by the collector
    pub vms_mb: f64,
    /// Resident set size in megabytes, precomputed by the collector
    pub rss_mb: f64,
}

/// Cumulative I/O counters for a process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoStats {
    /// Bytes read from storage
    pub read_bytes: u64,
    /// Bytes written to storage
    pub write_bytes: u64,
    /// Number of read operations
    pub read_ops: u64,
    /// Number of write operations
    pub write_ops: u64,
}

/// Information about a process in the ancestry chain
///
/// `command` and `cmdline` may each be empty; renderers fall back between
/// them. Optional string fields are `None` when the collector could not
/// determine them, and the matching output line is simply omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    /// Process ID
    pub pid: i32,
    /// Short executable name
    pub command: String,
    /// Full command line invocation
    #[serde(default)]
    pub cmdline: String,
    /// Owning user
    #[serde(default)]
    pub user: Option<String>,
    /// Container the process runs in, if any
    #[serde(default)]
    pub container: Option<String>,
    /// Supervising service unit, if any
    #[serde(default)]
    pub service: Option<String>,
    /// Health status; "healthy" is the quiet default and is not displayed
    #[serde(default)]
    pub health: Option<String>,
    /// Fork status flag; only the value "forked" has a display effect
    #[serde(default)]
    pub forked: Option<String>,
    /// Process start time
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    /// Current working directory
    #[serde(default)]
    pub working_dir: Option<String>,
    /// Git repository the working directory belongs to
    #[serde(default)]
    pub git_repo: Option<String>,
    /// Checked-out branch of that repository
    #[serde(default)]
    pub git_branch: Option<String>,
    /// Ports the process listens on, parallel to `bind_addresses`
    #[serde(default)]
    pub listening_ports: Vec<u16>,
    /// Bind addresses, parallel to `listening_ports`
    #[serde(default)]
    pub bind_addresses: Vec<String>,
    /// Memory usage sample
    #[serde(default)]
    pub memory: MemoryStats,
    /// I/O counters sample
    #[serde(default)]
    pub io: IoStats,
    /// Number of open file descriptors
    #[serde(default)]
    pub fd_count: u32,
    /// File descriptor limit
    #[serde(default)]
    pub fd_limit: u32,
    /// Descriptions of open file descriptors
    #[serde(default)]
    pub file_descs: Vec<String>,
    /// Number of threads
    #[serde(default)]
    pub thread_count: u32,
    /// PIDs of direct children
    #[serde(default)]
    pub children: Vec<i32>,
    /// Raw `KEY=VALUE` environment entries; duplicates and entries
    /// without `=` are both legal and passed through as-is
    #[serde(default)]
    pub env: Vec<String>,
}

impl Process {
    /// Display name for chain views: the short command, or the full
    /// command line when the short name is missing.
    pub fn display_name(&self) -> &str {
        if self.command.is_empty() {
            &self.cmdline
        } else {
            &self.command
        }
    }
}

/// What started (and keeps) the process running
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Classification label, e.g. "systemd service" or "shell"
    #[serde(rename = "type")]
    pub kind: String,
    /// Concrete unit or parent name, when it adds information over `kind`
    #[serde(default)]
    pub name: Option<String>,
}

impl Source {
    /// Create an unknown source classification
    pub fn unknown() -> Self {
        Self {
            kind: "unknown".to_string(),
            name: None,
        }
    }
}
