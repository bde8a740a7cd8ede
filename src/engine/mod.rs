//! 推論エンジン連携
//!
//! モデル読み込みと推論の2操作だけを外部に委ねる。

mod command;
mod identity;

pub use command::CommandEngine;
pub use identity::IdentityEngine;

use crate::config::{Config, EngineKind};
use crate::error::{Result, StyleTransferError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 読み込み済みモデル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub style_id: String,
    pub asset_path: PathBuf,
}

pub trait InferenceEngine: Send + Sync {
    fn load_model(&self, style_id: &str) -> Result<Model>;

    /// 結果画像を `output` に書き出す
    fn stylize(&self, model: &Model, input: &Path, output: &Path) -> Result<()>;
}

/// 設定に応じたエンジンを作成
pub fn from_config(config: &Config) -> Arc<dyn InferenceEngine> {
    let models = ModelStore::new(config.layout().models, &config.model_extension);
    match config.engine {
        EngineKind::Command => Arc::new(CommandEngine::new(models, config.engine_command.clone())),
        EngineKind::Identity => Arc::new(IdentityEngine::new(models)),
    }
}

/// `saved_models/<styleId>.<ext>` の探索
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
    extension: String,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn asset_path(&self, style_id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", style_id, self.extension))
    }

    /// モデルファイルを確認して Model を返す
    pub fn locate(&self, style_id: &str) -> Result<Model> {
        if style_id.is_empty() || style_id.contains(['/', '\\']) || style_id.contains("..") {
            return Err(StyleTransferError::NotFound(format!("style model {:?}", style_id)));
        }

        let asset_path = self.asset_path(style_id);
        let metadata = std::fs::metadata(&asset_path)
            .map_err(|_| StyleTransferError::NotFound(asset_path.display().to_string()))?;

        if !metadata.is_file() {
            return Err(StyleTransferError::NotFound(asset_path.display().to_string()));
        }
        if metadata.len() == 0 {
            return Err(StyleTransferError::Engine(format!(
                "malformed model asset (empty): {}",
                asset_path.display()
            )));
        }

        Ok(Model {
            style_id: style_id.to_string(),
            asset_path,
        })
    }
}
