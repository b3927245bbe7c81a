//! procwhy-core: Core models and rendering for procwhy
//!
//! This crate contains the OS-agnostic domain models describing why a
//! process exists, and the output rendering (text, environment with
//! credential redaction, JSON).
//!
//! # Modules
//!
//! - [`models`] - Core data structures (Process, MemoryStats, Source, etc.)
//! - [`report`] - The Report struct that aggregates analysis results
//! - [`render`] - Output formatters (standard, warnings, env-only, JSON)
//!
//! # Example
//!
//! ```
//! use procwhy_core::render::{self, Theme};
//!
//! let theme = Theme::new(false);
//! let mut out = Vec::new();
//! render::render_warnings(&mut out, &[], &theme);
//! assert_eq!(out, b"No warnings.\n");
//! ```

pub mod models;
pub mod render;
pub mod report;

// Re-export commonly used types at crate root
pub use models::{IoStats, MemoryStats, Process, Source};
pub use render::Theme;
pub use report::Report;
