//! Time-bounded directory usage probe for dirusage.
//!
//! This crate answers "how big is this folder" without blocking for long:
//! it walks a subtree with jwalk on the calling thread and stops pulling
//! entries once a deadline passes, returning the totals gathered so far.
//!
//! # Overview
//!
//! - **Deadline-bounded** walks with partial results flagged as incomplete
//! - **Soft skipping** of directories the caller may not list
//! - **Progress updates** via broadcast channels
//! - **Invocation-local** totals, so one probe can serve many callers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use dirusage_probe::DirectoryUsageProbe;
//!
//! let probe = DirectoryUsageProbe::new();
//! let result = probe.measure("/path/to/measure", Duration::from_secs(2)).unwrap();
//!
//! println!("Total size: {} bytes", result.total_bytes);
//! println!("Entries: {}", result.entry_count);
//! if !result.completed {
//!     println!("(lower bound, ran out of time)");
//! }
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use dirusage_probe::DirectoryUsageProbe;
//!
//! let probe = DirectoryUsageProbe::new();
//! let mut progress_rx = probe.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         println!("Counted {} entries", progress.entries_visited);
//!     }
//! });
//! ```

use std::path::Path;
use std::time::Duration;

mod probe;
mod progress;

pub use probe::DirectoryUsageProbe;
pub use progress::ProbeProgress;

// Re-export core types for convenience
pub use dirusage_core::{
    EntryKind, EntryTally, ProbeError, ProbeWarning, TraversalRequest, TraversalRequestBuilder,
    TraversalResult, WarningKind,
};

/// Measure `path` with a fresh probe, stopping once `timeout` elapses.
pub fn measure(path: impl AsRef<Path>, timeout: Duration) -> Result<TraversalResult, ProbeError> {
    DirectoryUsageProbe::new().measure(path, timeout)
}
