//! スタイル変換パイプライン
//!
//! 入力解決 → モデル読み込み → 出力先決定 → 推論 の順に実行し、
//! 途中で失敗したらその段階を付けたエラーを返す（部分的な結果は返さない）。

use crate::config::Config;
use crate::engine::{self, InferenceEngine};
use crate::error::{PipelineError, PipelineStage, StyleTransferError};
use crate::namer::ArtifactNamer;
use crate::resolver::ImageSourceResolver;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use style_transfer_common::{ContentSource, PipelineResult};

#[derive(Clone)]
pub struct PipelineOrchestrator {
    resolver: ImageSourceResolver,
    engine: Arc<dyn InferenceEngine>,
    namer: ArtifactNamer,
    output_dir: PathBuf,
}

impl PipelineOrchestrator {
    pub fn new(
        resolver: ImageSourceResolver,
        engine: Arc<dyn InferenceEngine>,
        namer: ArtifactNamer,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            engine,
            namer,
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let layout = config.layout();
        Self::new(
            ImageSourceResolver::new(layout.content_images, layout.uploads),
            engine::from_config(config),
            ArtifactNamer::default(),
            layout.outputs,
        )
    }

    pub fn resolver(&self) -> &ImageSourceResolver {
        &self.resolver
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn run(
        &self,
        style_id: &str,
        source: &ContentSource,
    ) -> std::result::Result<PipelineResult, PipelineError> {
        log::info!("style transfer start: style={} source={}", style_id, source.choice());

        let input = self
            .resolver
            .resolve(source)
            .map_err(stage(PipelineStage::InputResolution))?;
        log::debug!(
            "input resolved: {} (temporary: {})",
            input.path.display(),
            input.is_temporary
        );

        let model = self
            .engine
            .load_model(style_id)
            .map_err(stage(PipelineStage::ModelLoad))?;

        let target = self
            .namer
            .next_output(&self.output_dir)
            .map_err(stage(PipelineStage::OutputPreparation))?;

        self.engine
            .stylize(&model, &input.path, &target.path)
            .map_err(stage(PipelineStage::Inference))?;

        log::info!("style transfer done: {}", target.path.display());

        Ok(PipelineResult {
            output_image_path: target.path,
            timestamp: target.timestamp,
        })
    }
}

fn stage(stage: PipelineStage) -> impl FnOnce(StyleTransferError) -> PipelineError {
    move |source| {
        log::warn!("{} failed: {}", stage, source);
        PipelineError::new(stage, source)
    }
}
