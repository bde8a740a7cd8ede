use crate::error::{Result, StyleTransferError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use style_transfer_common::DirectoryLayout;

/// ベースディレクトリを上書きする環境変数
pub const BASE_DIR_ENV: &str = "STYLE_TRANSFER_BASE_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// 外部コマンドで推論
    #[default]
    Command,
    /// 入力をJPEGに再エンコードするだけ（動作確認用）
    Identity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_dir: PathBuf,
    pub engine: EngineKind,
    /// `{model}` `{input}` `{output}` を置換して実行する
    pub engine_command: Vec<String>,
    pub model_extension: String,
    /// None ならアップロードを削除しない
    pub upload_retention_hours: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            engine: EngineKind::Command,
            engine_command: vec![
                "python".into(),
                "neural_style/neural_style.py".into(),
                "eval".into(),
                "--model".into(),
                "{model}".into(),
                "--content-image".into(),
                "{input}".into(),
                "--output-image".into(),
                "{output}".into(),
            ],
            model_extension: "pth".into(),
            upload_retention_hours: None,
        }
    }
}

impl Config {
    /// 設定ファイルを読み込み、環境変数を反映
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(dir) = std::env::var(BASE_DIR_ENV) {
            if !dir.is_empty() {
                config.base_dir = PathBuf::from(dir);
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| StyleTransferError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("style-transfer").join("config.json"))
    }

    pub fn layout(&self) -> DirectoryLayout {
        DirectoryLayout::under(&self.base_dir)
    }

    /// `config --set-*` の反映。変更があれば true
    pub fn apply_settings(
        &mut self,
        base_dir: Option<PathBuf>,
        engine_command: Option<&str>,
        retention_hours: Option<u64>,
    ) -> bool {
        let mut changed = false;
        if let Some(dir) = base_dir {
            self.base_dir = dir;
            changed = true;
        }
        if let Some(command) = engine_command {
            self.engine_command = command.split_whitespace().map(String::from).collect();
            changed = true;
        }
        if let Some(hours) = retention_hours {
            self.upload_retention_hours = Some(hours);
            changed = true;
        }
        changed
    }

    /// `config --show` の表示内容
    pub fn summary(&self) -> Result<String> {
        let retention = match self.upload_retention_hours {
            Some(h) => format!("{}時間", h),
            None => "無期限".to_string(),
        };
        Ok(format!(
            "設定:\n  ベースディレクトリ: {}\n  エンジン: {:?}\n  推論コマンド: {}\n  モデル拡張子: {}\n  アップロード保持: {}\n  ディレクトリ:\n{}",
            self.base_dir.display(),
            self.engine,
            self.engine_command.join(" "),
            self.model_extension,
            retention,
            serde_json::to_string_pretty(&self.layout())?
        ))
    }

    fn validate(&self) -> Result<()> {
        if self.engine == EngineKind::Command && self.engine_command.is_empty() {
            return Err(StyleTransferError::Config("engine_command is empty".into()));
        }
        if self.model_extension.is_empty() {
            return Err(StyleTransferError::Config("model_extension is empty".into()));
        }
        Ok(())
    }
}
