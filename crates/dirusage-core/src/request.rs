//! Probe request types.

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// Time budget used when a request does not set one.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(5);

/// A single bounded walk: where to start and how long it may take.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct TraversalRequest {
    /// Root path to measure. May be a file.
    pub root_path: PathBuf,

    /// Wall-clock budget for the walk, measured on a monotonic clock.
    #[builder(default = "DEFAULT_TIME_BUDGET")]
    #[serde(default = "default_time_budget")]
    pub time_budget: Duration,

    /// Include hidden entries (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Follow symbolic links into their targets.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Maximum depth to descend (None = unlimited, 0 = root only).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,
}

fn default_true() -> bool {
    true
}

fn default_time_budget() -> Duration {
    DEFAULT_TIME_BUDGET
}

impl TraversalRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root_path {
            Some(ref root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }

    /// Build the request, reporting validation failures as a [`ProbeError`].
    pub fn finish(&self) -> Result<TraversalRequest, ProbeError> {
        self.build().map_err(|e| ProbeError::InvalidRequest {
            message: e.to_string(),
        })
    }
}

impl TraversalRequest {
    /// Create a new request builder.
    pub fn builder() -> TraversalRequestBuilder {
        TraversalRequestBuilder::default()
    }

    /// Create a plain request for a path and budget.
    pub fn new(root_path: impl Into<PathBuf>, time_budget: Duration) -> Self {
        Self {
            root_path: root_path.into(),
            time_budget,
            include_hidden: true,
            follow_symlinks: false,
            max_depth: None,
        }
    }

    /// Depth limit in the walker's terms.
    pub fn depth_limit(&self) -> usize {
        self.max_depth.map(|d| d as usize).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = TraversalRequest::builder()
            .root_path("/home/user")
            .time_budget(Duration::from_millis(250))
            .max_depth(2u32)
            .build()
            .unwrap();

        assert_eq!(request.root_path, PathBuf::from("/home/user"));
        assert_eq!(request.time_budget, Duration::from_millis(250));
        assert_eq!(request.max_depth, Some(2));
        assert_eq!(request.depth_limit(), 2);
        assert!(request.include_hidden);
        assert!(!request.follow_symlinks);
    }

    #[test]
    fn test_request_builder_defaults() {
        let request = TraversalRequest::builder()
            .root_path("/tmp")
            .build()
            .unwrap();

        assert_eq!(request.time_budget, DEFAULT_TIME_BUDGET);
        assert_eq!(request.depth_limit(), usize::MAX);
    }

    #[test]
    fn test_request_builder_rejects_empty_root() {
        let err = TraversalRequest::builder()
            .root_path("")
            .finish()
            .unwrap_err();
        assert!(matches!(err, ProbeError::InvalidRequest { .. }));

        assert!(TraversalRequest::builder().build().is_err());
    }

    #[test]
    fn test_request_simple() {
        let request = TraversalRequest::new("/home/user", Duration::ZERO);
        assert_eq!(request.time_budget, Duration::ZERO);
        assert!(request.max_depth.is_none());
    }
}
