//! Error types for probe operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that end a probe without a result.
///
/// Running out of time is not an error: a walk cut short by its deadline
/// still returns a [`TraversalResult`](crate::TraversalResult) flagged as
/// incomplete.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The root path is missing or not readable.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// The walk itself failed for a structural reason.
    #[error("Walk failed at {path}: {source}")]
    WalkFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid request.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ProbeError {
    /// Create a walk failure with path context.
    pub fn walk(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WalkFailed {
            path: path.into(),
            source,
        }
    }

    /// Check if this error came from the up-front root check.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

/// Kind of probe warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// A directory could not be listed or entered, or a metadata read was refused.
    PermissionDenied,
    /// The entry disappeared between listing and stat.
    Vanished,
    /// A followed symlink leads back to one of its ancestors.
    SymlinkLoop,
}

/// Entry skipped during a walk without failing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeWarning {
    /// Path that was skipped.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ProbeWarning {
    /// Create a permission denied warning.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Permission denied: {}", path.display()),
            path,
            kind: WarningKind::PermissionDenied,
        }
    }

    /// Create a warning for an entry that vanished mid-walk.
    pub fn vanished(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Vanished during walk: {}", path.display()),
            path,
            kind: WarningKind::Vanished,
        }
    }

    /// Create a symlink loop warning.
    pub fn symlink_loop(path: impl Into<PathBuf>, ancestor: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ancestor = ancestor.into();
        Self {
            message: format!(
                "Symlink loop: {} -> {}",
                path.display(),
                ancestor.display()
            ),
            path,
            kind: WarningKind::SymlinkLoop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_error_keeps_source() {
        use std::error::Error as _;

        let err = ProbeError::walk(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ProbeError::WalkFailed { .. }));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/test/path"));
        assert!(!err.is_permission_denied());
    }

    #[test]
    fn test_probe_warning_creation() {
        let warning = ProbeWarning::permission_denied("/test/path");
        assert_eq!(warning.kind, WarningKind::PermissionDenied);
        assert!(warning.message.contains("Permission denied"));

        let warning = ProbeWarning::symlink_loop("/a/link", "/a");
        assert_eq!(warning.kind, WarningKind::SymlinkLoop);
        assert!(warning.message.contains("/a/link"));
    }
}
