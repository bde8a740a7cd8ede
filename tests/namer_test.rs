//! 出力ファイル名生成のテスト

mod support;

use std::sync::Arc;
use style_transfer::namer::{parse_output_timestamp, ArtifactNamer};
use support::ManualClock;

#[test]
fn test_creates_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("images").join("output-images");

    let namer = ArtifactNamer::new(Arc::new(ManualClock::at(2026, 1, 18, 9, 30, 5)));
    let path = namer.next_output_path(&base).unwrap();

    assert!(base.is_dir());
    assert_eq!(path, base.join("result_20260118-093005.jpg"));

    // 2回目も失敗しない（冪等）
    namer.next_output_path(&base).unwrap();
}

/// 同じ秒なら同じパス（上書き方針）
#[test]
fn test_same_second_same_path() {
    let dir = tempfile::tempdir().unwrap();
    let namer = ArtifactNamer::new(Arc::new(ManualClock::at(2026, 3, 1, 23, 59, 59)));

    let first = namer.next_output_path(dir.path()).unwrap();
    let second = namer.next_output_path(dir.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_different_seconds_distinct_paths() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::at(2026, 3, 1, 23, 59, 59));
    let namer = ArtifactNamer::new(clock.clone());

    let first = namer.next_output(dir.path()).unwrap();
    clock.advance_secs(1);
    let second = namer.next_output(dir.path()).unwrap();

    assert_ne!(first.path, second.path);
    assert_eq!(first.timestamp, "20260301-235959");
    assert_eq!(second.timestamp, "20260302-000000");
}

#[test]
fn test_timestamp_matches_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let target = ArtifactNamer::default().next_output(dir.path()).unwrap();
    let name = target.path.file_name().unwrap().to_string_lossy().to_string();

    assert_eq!(parse_output_timestamp(&name), Some(target.timestamp.as_str()));
    assert_eq!(target.timestamp.len(), 15);
}
