//! Deadline-bounded directory walk built on jwalk.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use jwalk::{Parallelism, WalkDirGeneric};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use dirusage_core::{
    EntryKind, EntryTally, ProbeError, ProbeWarning, TraversalRequest, TraversalResult,
};

use crate::progress::ProbeProgress;

/// Counted entries between two progress snapshots.
const PROGRESS_INTERVAL: u64 = 1000;

/// jwalk client state: each directory entry carries whether it can be entered.
type ProbeState = ((), bool);

/// Measures how much space a directory subtree occupies, within a time budget.
///
/// The probe keeps no totals between calls; every invocation accumulates into
/// its own state, so one probe can be shared across threads.
pub struct DirectoryUsageProbe {
    progress_tx: broadcast::Sender<ProbeProgress>,
}

impl DirectoryUsageProbe {
    /// Create a new probe.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to probe progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ProbeProgress> {
        self.progress_tx.subscribe()
    }

    /// Measure `root_path`, giving up on further entries once `timeout` elapses.
    pub fn measure(
        &self,
        root_path: impl AsRef<Path>,
        timeout: Duration,
    ) -> Result<TraversalResult, ProbeError> {
        self.run(&TraversalRequest::new(root_path.as_ref(), timeout))
    }

    /// Run a probe described by `request`.
    pub fn run(&self, request: &TraversalRequest) -> Result<TraversalResult, ProbeError> {
        check_readable(&request.root_path)?;

        let root = fs::canonicalize(&request.root_path)
            .map_err(|e| ProbeError::walk(&request.root_path, e))?;

        let start = Instant::now();
        // An unrepresentable deadline means the budget never runs out.
        let deadline = start.checked_add(request.time_budget);

        debug!(
            root = %root.display(),
            budget = ?request.time_budget,
            "Starting directory probe"
        );

        let mut walker = WalkDirGeneric::<ProbeState>::new(&root)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(!request.include_hidden)
            .follow_links(request.follow_symlinks)
            .min_depth(0)
            .max_depth(request.depth_limit())
            .process_read_dir(|_depth, _path, _state, children| {
                // Never descend into a directory that cannot be entered.
                for dir_entry in children.iter_mut().flatten() {
                    if dir_entry.file_type().is_dir() && !is_traversable(&dir_entry.path()) {
                        dir_entry.read_children_path = None;
                        dir_entry.client_state = true;
                    }
                }
            })
            .into_iter()
            .peekable();

        let follow = request.follow_symlinks;
        let mut acc = Accumulator::default();
        let mut completed = true;

        while let Some(item) = walker.next() {
            match item {
                Ok(mut entry) => {
                    let path = entry.path();
                    let kind = EntryKind::from_file_type(entry.file_type());

                    // A directory that cannot be entered or listed is left out along
                    // with its contents.
                    if entry.client_state {
                        debug!(path = %path.display(), "Skipping untraversable directory");
                        acc.warnings.push(ProbeWarning::permission_denied(path));
                    } else if let Some(err) = entry.read_children_error.take() {
                        handle_error(err, &root, follow, &mut acc)?;
                    } else {
                        match entry.metadata() {
                            Ok(metadata) => {
                                acc.record(kind, &metadata);
                                if acc.tally.total() % PROGRESS_INTERVAL == 0 {
                                    let _ = self.progress_tx.send(acc.snapshot(path, start));
                                }
                            }
                            Err(err) => handle_error(err, &root, follow, &mut acc)?,
                        }
                    }
                }
                Err(err) => handle_error(err, &root, follow, &mut acc)?,
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                // The peek may read one more directory listing past the deadline;
                // nothing from it is counted.
                completed = walker.peek().is_none();
                break;
            }
        }

        let elapsed = start.elapsed();
        let _ = self.progress_tx.send(acc.snapshot(root.clone(), start));

        if completed {
            info!(
                root = %root.display(),
                entries = acc.tally.total(),
                bytes = acc.total_bytes,
                elapsed_ms = elapsed.as_millis() as u64,
                "Directory probe finished"
            );
        } else {
            warn!(
                root = %root.display(),
                entries = acc.tally.total(),
                bytes = acc.total_bytes,
                elapsed_ms = elapsed.as_millis() as u64,
                "Directory probe stopped at its deadline, totals are partial"
            );
        }

        Ok(acc.finish(completed, elapsed))
    }
}

impl Default for DirectoryUsageProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Running totals owned by a single invocation.
#[derive(Debug, Default)]
struct Accumulator {
    total_bytes: u64,
    allocated_bytes: u64,
    tally: EntryTally,
    warnings: Vec<ProbeWarning>,
}

impl Accumulator {
    fn record(&mut self, kind: EntryKind, metadata: &Metadata) {
        self.total_bytes = self.total_bytes.saturating_add(metadata.len());
        self.allocated_bytes = self.allocated_bytes.saturating_add(get_allocated(metadata));
        self.tally.record(kind);
    }

    fn snapshot(&self, current_path: PathBuf, start: Instant) -> ProbeProgress {
        ProbeProgress {
            entries_visited: self.tally.total(),
            bytes_visited: self.total_bytes,
            current_path,
            warnings_count: self.warnings.len() as u64,
            elapsed: start.elapsed(),
        }
    }

    fn finish(self, completed: bool, elapsed: Duration) -> TraversalResult {
        TraversalResult {
            total_bytes: self.total_bytes,
            allocated_bytes: self.allocated_bytes,
            entry_count: self.tally.total(),
            completed,
            tally: self.tally,
            elapsed,
            warnings: self.warnings,
        }
    }
}

/// Fail with `PermissionDenied` unless `path` can be opened for reading.
fn check_readable(path: &Path) -> Result<(), ProbeError> {
    let readable = match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => fs::read_dir(path).map(drop),
        Ok(metadata) if metadata.is_file() => fs::File::open(path).map(drop),
        // Opening a fifo would block, a successful stat is enough for specials.
        Ok(_) => Ok(()),
        Err(err) => Err(err),
    };

    readable.map_err(|err| {
        debug!(path = %path.display(), error = %err, "Root is not readable");
        ProbeError::PermissionDenied {
            path: path.to_path_buf(),
        }
    })
}

/// Whether a directory can be entered: a lookup through it must not be refused.
fn is_traversable(dir: &Path) -> bool {
    match fs::metadata(dir.join(".")) {
        Ok(_) => true,
        Err(err) => err.kind() != io::ErrorKind::PermissionDenied,
    }
}

/// Metadata of a symlink whose target does not exist.
fn dangling_link_metadata(path: &Path) -> Option<Metadata> {
    let metadata = fs::symlink_metadata(path).ok()?;
    (metadata.file_type().is_symlink() && fs::metadata(path).is_err()).then_some(metadata)
}

/// Count a dangling link when links are followed, otherwise skip or fail.
fn handle_error(
    err: jwalk::Error,
    root: &Path,
    follow_symlinks: bool,
    acc: &mut Accumulator,
) -> Result<(), ProbeError> {
    if follow_symlinks {
        if let Some(metadata) = err.path().and_then(dangling_link_metadata) {
            acc.record(EntryKind::Symlink, &metadata);
            return Ok(());
        }
    }
    skip_or_fail(err, root, &mut acc.warnings)
}

/// How a walk error is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    /// Skip the entry, permission denied.
    SkipDenied,
    /// Skip the entry, it disappeared mid-walk.
    SkipVanished,
    /// End the walk with `WalkFailed`.
    Fail,
}

/// Errors below the root are soft only when access was refused or the entry vanished.
fn classify(path: &Path, root: &Path, kind: Option<io::ErrorKind>) -> Disposition {
    if path == root {
        return Disposition::Fail;
    }
    match kind {
        Some(io::ErrorKind::PermissionDenied) => Disposition::SkipDenied,
        Some(io::ErrorKind::NotFound) => Disposition::SkipVanished,
        _ => Disposition::Fail,
    }
}

/// Record a soft failure as a warning, or turn it into `WalkFailed`.
fn skip_or_fail(
    err: jwalk::Error,
    root: &Path,
    warnings: &mut Vec<ProbeWarning>,
) -> Result<(), ProbeError> {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());

    if let Some(ancestor) = err.loop_ancestor() {
        debug!(path = %path.display(), "Skipping symlink loop");
        warnings.push(ProbeWarning::symlink_loop(&path, ancestor));
        return Ok(());
    }

    let kind = err.io_error().map(io::Error::kind);
    match classify(&path, root, kind) {
        Disposition::SkipDenied => {
            debug!(path = %path.display(), "Skipping entry, permission denied");
            warnings.push(ProbeWarning::permission_denied(path));
            Ok(())
        }
        Disposition::SkipVanished => {
            debug!(path = %path.display(), "Skipping entry that vanished");
            warnings.push(ProbeWarning::vanished(path));
            Ok(())
        }
        Disposition::Fail => {
            let source = io::Error::new(kind.unwrap_or(io::ErrorKind::Other), err.to_string());
            Err(ProbeError::walk(path, source))
        }
    }
}

/// Space allocated on disk, in bytes.
#[cfg(unix)]
fn get_allocated(metadata: &Metadata) -> u64 {
    metadata.blocks().saturating_mul(512)
}

#[cfg(not(unix))]
fn get_allocated(metadata: &Metadata) -> u64 {
    metadata.len()
}
