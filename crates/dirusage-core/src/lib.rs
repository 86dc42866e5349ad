//! Core types for dirusage.
//!
//! This crate holds the data model shared by the probe and its callers:
//! the request describing a bounded walk, the result it produces, and the
//! error taxonomy separating hard failures from skipped entries.

mod entry;
mod error;
mod request;
mod result;

pub use entry::EntryKind;
pub use error::{ProbeError, ProbeWarning, WarningKind};
pub use request::{TraversalRequest, TraversalRequestBuilder};
pub use result::{EntryTally, TraversalResult};
