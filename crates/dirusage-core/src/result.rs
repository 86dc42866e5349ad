//! Probe result and running totals.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entry::EntryKind;
use crate::error::ProbeWarning;

/// Per-kind entry counts for one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTally {
    /// Regular files.
    pub files: u64,
    /// Directories, including the root when it is one.
    pub directories: u64,
    /// Symbolic links.
    pub symlinks: u64,
    /// Sockets, fifos, devices.
    pub other: u64,
}

impl EntryTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one entry of the given kind.
    pub fn record(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::File => self.files += 1,
            EntryKind::Directory => self.directories += 1,
            EntryKind::Symlink => self.symlinks += 1,
            EntryKind::Other => self.other += 1,
        }
    }

    /// Total entries counted.
    pub fn total(&self) -> u64 {
        self.files + self.directories + self.symlinks + self.other
    }
}

/// Totals produced by one probe invocation.
///
/// When `completed` is false the walk ran out of time and the totals are a
/// lower bound: every counted entry would also be counted by a longer walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalResult {
    /// Sum of the logical sizes of every counted entry.
    pub total_bytes: u64,
    /// Sum of the space allocated on disk for every counted entry.
    pub allocated_bytes: u64,
    /// Number of counted entries, the root included.
    pub entry_count: u64,
    /// Whether every reachable entry was visited before the deadline.
    pub completed: bool,
    /// Breakdown of `entry_count` by entry kind.
    pub tally: EntryTally,
    /// Time spent walking.
    pub elapsed: Duration,
    /// Entries skipped without failing the walk.
    pub warnings: Vec<ProbeWarning>,
}

impl TraversalResult {
    /// Check if the walk was cut short by its deadline.
    pub fn is_partial(&self) -> bool {
        !self.completed
    }

    /// Check if any entries were skipped.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Mean logical size of the counted entries, if any were counted.
    pub fn average_entry_size(&self) -> Option<u64> {
        self.total_bytes.checked_div(self.entry_count)
    }
}
