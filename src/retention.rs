//! アップロード・出力ファイルの保持期間管理
//!
//! 既定では何も削除しない。保持時間を設定した場合のみ、
//! 最終更新から一定時間経過したファイルを削除する。

use crate::error::Result;
use crate::namer::parse_output_timestamp;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    /// 削除した（dry run なら削除予定の）ファイル
    pub removed: Vec<PathBuf>,
    pub kept: usize,
}

/// 時間指定の保持期間（大きすぎる値は上限に張り付く）
pub fn max_age_from_hours(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}

/// アップロードディレクトリの古いファイルを削除
pub fn prune_uploads(dir: &Path, max_age: Duration, dry_run: bool) -> Result<PruneReport> {
    prune(dir, max_age, SystemTime::now(), dry_run, |_| true)
}

/// 生成済み出力（result_<timestamp>.jpg）の古いものを削除
pub fn prune_outputs(dir: &Path, max_age: Duration, dry_run: bool) -> Result<PruneReport> {
    prune(dir, max_age, SystemTime::now(), dry_run, |name| {
        parse_output_timestamp(name).is_some()
    })
}

fn prune<F>(dir: &Path, max_age: Duration, now: SystemTime, dry_run: bool, matches: F) -> Result<PruneReport>
where
    F: Fn(&str) -> bool,
{
    let mut report = PruneReport::default();
    if !dir.exists() {
        return Ok(report);
    }

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1) // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !matches(&name) {
            continue;
        }

        let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
        let expired = match modified {
            Some(t) => now.duration_since(t).unwrap_or_default() >= max_age,
            None => false,
        };

        if !expired {
            report.kept += 1;
            continue;
        }

        if !dry_run {
            std::fs::remove_file(path)?;
            log::info!("removed expired file: {}", path.display());
        }
        report.removed.push(path.to_path_buf());
    }

    report.removed.sort();
    Ok(report)
}
