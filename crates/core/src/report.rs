//! Report structure for process-origin analysis results

use crate::models::{Process, Source};
use serde::{Deserialize, Serialize};

/// Complete analysis report for one inspected process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Ancestry chain, root first, the inspected process last.
    /// Collectors never produce an empty chain.
    pub ancestry: Vec<Process>,
    /// How often the supervisor restarted the process
    #[serde(default)]
    pub restart_count: u32,
    /// Classified origin of the process
    pub source: Source,
    /// Warnings raised during collection, in the order they occurred
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Report {
    /// Create an empty report with an unknown source
    pub fn new() -> Self {
        Self {
            ancestry: Vec::new(),
            restart_count: 0,
            source: Source::unknown(),
            warnings: Vec::new(),
        }
    }

    /// The inspected process: the last element of the ancestry chain
    pub fn target(&self) -> Option<&Process> {
        self.ancestry.last()
    }

    /// Check if any warnings were raised
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Add a warning to the report
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
