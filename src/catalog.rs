//! スタイルカタログ
//!
//! スタイルID → 表示名・参照プレビュー画像の対応を保持する。

use crate::error::{Result, StyleTransferError};
use std::path::{Path, PathBuf};
use style_transfer_common::{builtin_styles, StyleOption};

#[derive(Debug, Clone)]
pub struct StyleCatalog {
    styles: Vec<StyleOption>,
    style_images_dir: PathBuf,
}

impl StyleCatalog {
    pub fn new(styles: Vec<StyleOption>, style_images_dir: impl Into<PathBuf>) -> Self {
        Self {
            styles,
            style_images_dir: style_images_dir.into(),
        }
    }

    /// 同梱スタイル一覧で作成
    pub fn builtin(style_images_dir: impl Into<PathBuf>) -> Self {
        Self::new(builtin_styles(), style_images_dir)
    }

    /// 表示順のスタイル一覧
    pub fn list_styles(&self) -> &[StyleOption] {
        &self.styles
    }

    pub fn get(&self, style_id: &str) -> Option<&StyleOption> {
        self.styles.iter().find(|s| s.id == style_id)
    }

    /// 先頭のスタイル（初期選択）
    pub fn default_style(&self) -> Option<&StyleOption> {
        self.styles.first()
    }

    /// `<style_images_dir>/<styleId>.jpg`（存在しなければ NotFound）
    pub fn preview_path_for(&self, style_id: &str) -> Result<PathBuf> {
        let path = self.style_images_dir.join(format!("{}.jpg", style_id));
        if !path.is_file() {
            return Err(StyleTransferError::NotFound(path.display().to_string()));
        }
        Ok(path)
    }

    pub fn style_images_dir(&self) -> &Path {
        &self.style_images_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_styles_in_insertion_order() {
        let catalog = StyleCatalog::builtin("/nonexistent");
        let labels: Vec<&str> = catalog
            .list_styles()
            .iter()
            .map(|s| s.display_label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["Candy Style", "Mosaic Art", "Rain Princess", "Udnie Abstract"]
        );
        assert_eq!(catalog.default_style().unwrap().id, "candy");
    }

    #[test]
    fn test_preview_path_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mosaic.jpg"), b"jpg").unwrap();

        let catalog = StyleCatalog::builtin(dir.path());
        let path = catalog.preview_path_for("mosaic").unwrap();
        assert_eq!(path, dir.path().join("mosaic.jpg"));
    }

    #[test]
    fn test_preview_path_missing_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = StyleCatalog::builtin(dir.path());

        let err = catalog.preview_path_for("udnie").unwrap_err();
        assert!(matches!(err, StyleTransferError::NotFound(_)));
    }

    #[test]
    fn test_get_unknown_style() {
        let catalog = StyleCatalog::builtin("/nonexistent");
        assert!(catalog.get("rain_princess").is_some());
        assert!(catalog.get("sepia").is_none());
    }
}
