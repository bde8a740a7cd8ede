//! ディレクトリ構成
//!
//! ベースディレクトリ配下の相対パスを一箇所で定義する。

use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CONTENT_IMAGES_DIR: &str = "images/content-images";
pub const STYLE_IMAGES_DIR: &str = "images/style-images";
pub const MODELS_DIR: &str = "saved_models";
pub const UPLOADS_DIR: &str = "uploaded_images";
pub const OUTPUT_IMAGES_DIR: &str = "images/output-images";

/// ベースディレクトリから解決した各ディレクトリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryLayout {
    pub content_images: PathBuf,
    pub style_images: PathBuf,
    pub models: PathBuf,
    pub uploads: PathBuf,
    pub outputs: PathBuf,
}

impl DirectoryLayout {
    pub fn under(base: &Path) -> Self {
        Self {
            content_images: base.join(CONTENT_IMAGES_DIR),
            style_images: base.join(STYLE_IMAGES_DIR),
            models: base.join(MODELS_DIR),
            uploads: base.join(UPLOADS_DIR),
            outputs: base.join(OUTPUT_IMAGES_DIR),
        }
    }
}
