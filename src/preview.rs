//! プレビュー表示用の画像読み込み

use crate::error::{Result, StyleTransferError};
use image::ImageReader;
use std::path::{Path, PathBuf};

/// プレビュー欄に表示する画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// ヘッダを読んで画像として開けるか確認する
pub fn load_preview(path: &Path) -> Result<Preview> {
    if !path.is_file() {
        return Err(StyleTransferError::NotFound(path.display().to_string()));
    }

    let (width, height) = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| {
            StyleTransferError::Validation(format!("not a readable image: {} ({})", path.display(), e))
        })?;

    Ok(Preview {
        path: path.to_path_buf(),
        width,
        height,
    })
}
