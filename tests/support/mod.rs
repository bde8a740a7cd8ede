//! 統合テスト共通のフィクスチャ

#![allow(dead_code)]

use chrono::{DateTime, Duration, Local, TimeZone};
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use style_transfer::catalog::StyleCatalog;
use style_transfer::engine::{InferenceEngine, Model, ModelStore};
use style_transfer::error::{Result, StyleTransferError};
use style_transfer::namer::{ArtifactNamer, Clock};
use style_transfer::pipeline::PipelineOrchestrator;
use style_transfer::resolver::ImageSourceResolver;
use style_transfer_common::DirectoryLayout;
use tempfile::TempDir;

/// ベースディレクトリ一式（カタログ画像・スタイル画像・モデル）
pub struct Fixture {
    pub dir: TempDir,
    pub layout: DirectoryLayout,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let layout = DirectoryLayout::under(dir.path());

        std::fs::create_dir_all(&layout.content_images).unwrap();
        std::fs::create_dir_all(&layout.style_images).unwrap();
        std::fs::create_dir_all(&layout.models).unwrap();

        for name in ["amber.jpg", "cat.png", "room.jpg"] {
            write_image(&layout.content_images.join(name), 16, 12);
        }
        for id in ["candy", "mosaic", "udnie"] {
            write_image(&layout.style_images.join(format!("{}.jpg", id)), 8, 8);
            std::fs::write(layout.models.join(format!("{}.pth", id)), b"weights").unwrap();
        }

        Self { dir, layout }
    }

    pub fn resolver(&self) -> ImageSourceResolver {
        ImageSourceResolver::new(&self.layout.content_images, &self.layout.uploads)
    }

    pub fn catalog(&self) -> StyleCatalog {
        StyleCatalog::builtin(&self.layout.style_images)
    }

    pub fn orchestrator(&self, engine: Arc<dyn InferenceEngine>) -> PipelineOrchestrator {
        PipelineOrchestrator::new(
            self.resolver(),
            engine,
            ArtifactNamer::default(),
            &self.layout.outputs,
        )
    }

    pub fn recording_engine(&self) -> Arc<RecordingEngine> {
        Arc::new(RecordingEngine::new(ModelStore::new(&self.layout.models, "pth")))
    }

    /// カタログ外の画像ファイル（アップロード元）
    pub fn external_image(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join("client").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        write_image(&path, 10, 10);
        path
    }
}

pub fn write_image(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([120, 80, 200]))
        .save(path)
        .expect("Failed to write test image");
}

/// ディレクトリ直下のエントリ数（存在しなければ0）
pub fn count_files(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).count(),
        Err(_) => 0,
    }
}

/// 呼び出しを記録し、入力をそのまま出力にコピーするエンジン
pub struct RecordingEngine {
    models: ModelStore,
    pub calls: Mutex<Vec<String>>,
    pub fail_inference: Mutex<Option<String>>,
    /// stylize をこの時間だけ止める
    pub delay: Mutex<std::time::Duration>,
}

impl RecordingEngine {
    pub fn new(models: ModelStore) -> Self {
        Self {
            models,
            calls: Mutex::new(Vec::new()),
            fail_inference: Mutex::new(None),
            delay: Mutex::new(std::time::Duration::ZERO),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_with(&self, message: &str) {
        *self.fail_inference.lock().unwrap() = Some(message.to_string());
    }

    pub fn set_delay(&self, delay: std::time::Duration) {
        *self.delay.lock().unwrap() = delay;
    }
}

impl InferenceEngine for RecordingEngine {
    fn load_model(&self, style_id: &str) -> Result<Model> {
        self.calls.lock().unwrap().push(format!("load_model:{}", style_id));
        self.models.locate(style_id)
    }

    fn stylize(&self, model: &Model, input: &Path, output: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("stylize:{}", model.style_id));

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        if let Some(message) = self.fail_inference.lock().unwrap().clone() {
            return Err(StyleTransferError::Engine(message));
        }
        std::fs::copy(input, output)?;
        Ok(())
    }
}

/// 手動で進める時計
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        let now = Local
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .earliest()
            .expect("valid local time");
        Self { now: Mutex::new(now) }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap();
        *now = *now + Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}
