use dirusage_core::{
    EntryKind, EntryTally, ProbeError, ProbeWarning, TraversalRequest, TraversalResult,
    WarningKind,
};
use std::path::PathBuf;
use std::time::Duration;

fn sample_result(completed: bool) -> TraversalResult {
    let mut tally = EntryTally::new();
    tally.record(EntryKind::Directory);
    tally.record(EntryKind::File);
    tally.record(EntryKind::File);

    TraversalResult {
        total_bytes: 300,
        allocated_bytes: 8192,
        entry_count: tally.total(),
        completed,
        tally,
        elapsed: Duration::from_millis(3),
        warnings: Vec::new(),
    }
}

#[test]
fn test_request_deserialize_fills_defaults() {
    let request: TraversalRequest =
        serde_json::from_str(r#"{ "root_path": "/srv/data" }"#).unwrap();

    assert_eq!(request.root_path, PathBuf::from("/srv/data"));
    assert_eq!(request.time_budget, Duration::from_secs(5));
    assert!(request.include_hidden);
    assert!(!request.follow_symlinks);
    assert!(request.max_depth.is_none());
}

#[test]
fn test_request_builder_and_new_agree() {
    let built = TraversalRequest::builder()
        .root_path("/srv/data")
        .time_budget(Duration::from_secs(2))
        .build()
        .unwrap();
    let plain = TraversalRequest::new("/srv/data", Duration::from_secs(2));

    assert_eq!(built.root_path, plain.root_path);
    assert_eq!(built.time_budget, plain.time_budget);
    assert_eq!(built.include_hidden, plain.include_hidden);
    assert_eq!(built.follow_symlinks, plain.follow_symlinks);
    assert_eq!(built.max_depth, plain.max_depth);
}

#[test]
fn test_result_partial_flag() {
    assert!(!sample_result(true).is_partial());
    assert!(sample_result(false).is_partial());
}

#[test]
fn test_result_average_entry_size() {
    let result = sample_result(true);
    assert_eq!(result.average_entry_size(), Some(100));

    let empty = TraversalResult {
        total_bytes: 0,
        allocated_bytes: 0,
        entry_count: 0,
        completed: false,
        tally: EntryTally::default(),
        elapsed: Duration::ZERO,
        warnings: Vec::new(),
    };
    assert_eq!(empty.average_entry_size(), None);
}

#[test]
fn test_result_json_shape() {
    let mut result = sample_result(false);
    result
        .warnings
        .push(ProbeWarning::permission_denied("/srv/data/locked"));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["total_bytes"], 300);
    assert_eq!(json["entry_count"], 3);
    assert_eq!(json["completed"], false);
    assert_eq!(json["tally"]["files"], 2);
    assert_eq!(json["warnings"][0]["kind"], "PermissionDenied");
    assert!(result.has_warnings());
}

#[test]
fn test_tally_counts_every_kind() {
    let mut tally = EntryTally::new();
    for kind in [
        EntryKind::File,
        EntryKind::Directory,
        EntryKind::Symlink,
        EntryKind::Other,
    ] {
        tally.record(kind);
    }

    assert_eq!(tally.other, 1);
    assert_eq!(tally.total(), 4);
}

#[test]
fn test_error_display() {
    let err = ProbeError::PermissionDenied {
        path: PathBuf::from("/root/secret"),
    };
    assert_eq!(err.to_string(), "Permission denied: /root/secret");
    assert!(err.is_permission_denied());

    let warning = ProbeWarning::vanished("/tmp/gone");
    assert_eq!(warning.kind, WarningKind::Vanished);
}
