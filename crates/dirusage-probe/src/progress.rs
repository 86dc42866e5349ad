//! Probe progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress information during a probe.
#[derive(Debug, Clone)]
pub struct ProbeProgress {
    /// Number of entries counted so far.
    pub entries_visited: u64,
    /// Logical bytes counted so far.
    pub bytes_visited: u64,
    /// Most recently counted path.
    pub current_path: PathBuf,
    /// Number of skipped entries so far.
    pub warnings_count: u64,
    /// Time elapsed since the walk started.
    pub elapsed: Duration,
}

impl ProbeProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            entries_visited: 0,
            bytes_visited: 0,
            current_path: PathBuf::new(),
            warnings_count: 0,
            elapsed: Duration::ZERO,
        }
    }
}

impl Default for ProbeProgress {
    fn default() -> Self {
        Self::new()
    }
}
