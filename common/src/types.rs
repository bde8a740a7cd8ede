//! データモデル
//!
//! - StyleOption: 選択可能なスタイル
//! - ContentSource: コンテンツ画像の入手元（カタログ or アップロード）
//! - ResolvedInput: 推論に渡す実在パス
//! - PipelineResult: 生成結果

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::CUSTOM_SOURCE;

/// スタイル選択肢（起動時に固定）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOption {
    /// プレビュー画像とモデルファイルを一意に指す識別子
    pub id: String,
    pub display_label: String,
}

impl StyleOption {
    pub fn new(id: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_label: display_label.into(),
        }
    }
}

/// アップロードされたファイルへの参照
///
/// UI側が一時保存したファイルのパスを保持するだけで、内容は読まない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadHandle {
    pub path: PathBuf,
}

impl UploadHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

/// コンテンツ画像の入手元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ContentSource {
    /// 同梱画像のファイル名
    Catalog(String),
    /// アップロード（未アップロードなら None）
    Custom(Option<UploadHandle>),
}

impl ContentSource {
    /// ドロップダウンの値から変換（"custom" はアップロード待ち）
    pub fn from_choice(choice: &str) -> Self {
        if choice == CUSTOM_SOURCE {
            ContentSource::Custom(None)
        } else {
            ContentSource::Catalog(choice.to_string())
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ContentSource::Custom(_))
    }

    /// ドロップダウン上の値
    pub fn choice(&self) -> &str {
        match self {
            ContentSource::Catalog(name) => name,
            ContentSource::Custom(_) => CUSTOM_SOURCE,
        }
    }
}

/// 解決済み入力画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub path: PathBuf,
    /// アップロードを保存したものなら true（後で削除され得る）
    pub is_temporary: bool,
}

/// スタイル変換の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub output_image_path: PathBuf,
    /// `YYYYMMDD-HHMMSS`
    pub timestamp: String,
}
