//! 再エンコードのみのエンジン（モデルは確認するが画風は変えない）

use super::{InferenceEngine, Model, ModelStore};
use crate::error::{Result, StyleTransferError};
use image::ImageReader;
use std::path::Path;

pub struct IdentityEngine {
    models: ModelStore,
}

impl IdentityEngine {
    pub fn new(models: ModelStore) -> Self {
        Self { models }
    }
}

impl InferenceEngine for IdentityEngine {
    fn load_model(&self, style_id: &str) -> Result<Model> {
        self.models.locate(style_id)
    }

    fn stylize(&self, model: &Model, input: &Path, output: &Path) -> Result<()> {
        log::debug!("identity stylize ({}): {}", model.style_id, input.display());

        let image = ImageReader::open(input)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| StyleTransferError::Engine(format!("decode {}: {}", input.display(), e)))?;

        // JPEGはアルファ非対応
        image
            .to_rgb8()
            .save_with_format(output, image::ImageFormat::Jpeg)
            .map_err(|e| StyleTransferError::Engine(format!("encode {}: {}", output.display(), e)))?;

        Ok(())
    }
}
