//! 外部コマンドによる推論
//!
//! 例: `python neural_style.py eval --model {model} --content-image {input} --output-image {output}`

use super::{InferenceEngine, Model, ModelStore};
use crate::error::{Result, StyleTransferError};
use std::path::Path;
use std::process::Command;

pub struct CommandEngine {
    models: ModelStore,
    argv: Vec<String>,
}

impl CommandEngine {
    pub fn new(models: ModelStore, argv: Vec<String>) -> Self {
        Self { models, argv }
    }

    /// プレースホルダを置換した引数列
    fn build_args(&self, model: &Model, input: &Path, output: &Path) -> Vec<String> {
        let model_path = model.asset_path.display().to_string();
        let input_path = input.display().to_string();
        let output_path = output.display().to_string();
        self.argv
            .iter()
            .map(|arg| {
                arg.replace("{model}", &model_path)
                    .replace("{input}", &input_path)
                    .replace("{output}", &output_path)
            })
            .collect()
    }
}

impl InferenceEngine for CommandEngine {
    fn load_model(&self, style_id: &str) -> Result<Model> {
        self.models.locate(style_id)
    }

    fn stylize(&self, model: &Model, input: &Path, output: &Path) -> Result<()> {
        let args = self.build_args(model, input, output);
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| StyleTransferError::Config("engine_command is empty".into()))?;

        // 前回の同名出力は先に消す
        match std::fs::remove_file(output) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        log::debug!("running inference: {} {}", program, rest.join(" "));

        // Windowsではcmd /c経由
        #[cfg(windows)]
        let result = Command::new("cmd").arg("/c").arg(program).args(rest).output();

        #[cfg(not(windows))]
        let result = Command::new(program).args(rest).output();

        let output_status = result
            .map_err(|e| StyleTransferError::Engine(format!("failed to start {}: {}", program, e)))?;

        if !output_status.status.success() {
            let stderr = String::from_utf8_lossy(&output_status.stderr);
            return Err(StyleTransferError::Engine(format!(
                "{} failed (code {:?}): {}",
                program,
                output_status.status.code(),
                stderr.trim()
            )));
        }

        if !output.is_file() {
            return Err(StyleTransferError::Engine(format!(
                "{} exited successfully but wrote no output to {}",
                program,
                output.display()
            )));
        }

        Ok(())
    }
}
