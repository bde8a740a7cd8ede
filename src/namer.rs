//! 出力ファイル名の生成
//!
//! `result_<YYYYMMDD-HHMMSS>.jpg`。秒単位なので同じ秒に2回実行すると
//! 後の結果で上書きされる（現状の挙動として維持）。

use crate::error::Result;
use chrono::{DateTime, Local};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

lazy_static::lazy_static! {
    static ref OUTPUT_NAME_RE: Regex = Regex::new(r"^result_(\d{8}-\d{6})\.jpg$").unwrap();
}

/// 現在時刻の取得元（テストで固定できるように）
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// 生成予定の出力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub timestamp: String,
}

#[derive(Clone)]
pub struct ArtifactNamer {
    clock: Arc<dyn Clock>,
}

impl Default for ArtifactNamer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for ArtifactNamer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactNamer").finish_non_exhaustive()
    }
}

impl ArtifactNamer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// 出力ディレクトリを作成し、次の出力パスを返す
    pub fn next_output(&self, base_dir: &Path) -> Result<OutputTarget> {
        std::fs::create_dir_all(base_dir)?;
        let timestamp = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        Ok(OutputTarget {
            path: base_dir.join(output_file_name(&timestamp)),
            timestamp,
        })
    }

    pub fn next_output_path(&self, base_dir: &Path) -> Result<PathBuf> {
        self.next_output(base_dir).map(|t| t.path)
    }
}

pub fn output_file_name(timestamp: &str) -> String {
    format!("result_{}.jpg", timestamp)
}

/// 生成済み出力のファイル名ならタイムスタンプ部分を返す
pub fn parse_output_timestamp(file_name: &str) -> Option<&str> {
    OUTPUT_NAME_RE
        .captures(file_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
