//! 入力画像の解決
//!
//! UIの選択（カタログ名 or アップロード）を読み取り可能なパスに変換する。
//! アップロードは管理ディレクトリへコピーする（同名は上書き）。

use crate::error::{Result, StyleTransferError};
use std::path::{Component, Path, PathBuf};
use style_transfer_common::{ContentSource, ResolvedInput, UploadHandle};

#[derive(Debug, Clone)]
pub struct ImageSourceResolver {
    catalog_dir: PathBuf,
    uploads_dir: PathBuf,
}

impl ImageSourceResolver {
    pub fn new(catalog_dir: impl Into<PathBuf>, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog_dir: catalog_dir.into(),
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn resolve(&self, source: &ContentSource) -> Result<ResolvedInput> {
        match source {
            ContentSource::Catalog(file_name) => self.resolve_catalog(file_name),
            ContentSource::Custom(handle) => self.persist_upload(handle.as_ref()),
        }
    }

    /// カタログ画像のパス（存在確認のみ）
    pub fn catalog_path(&self, file_name: &str) -> Result<PathBuf> {
        validate_file_name(file_name)?;
        let path = self.catalog_dir.join(file_name);
        if !path.is_file() {
            return Err(StyleTransferError::NotFound(path.display().to_string()));
        }
        Ok(path)
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    fn resolve_catalog(&self, file_name: &str) -> Result<ResolvedInput> {
        Ok(ResolvedInput {
            path: self.catalog_path(file_name)?,
            is_temporary: false,
        })
    }

    fn persist_upload(&self, handle: Option<&UploadHandle>) -> Result<ResolvedInput> {
        let handle = match handle {
            Some(h) if !h.is_empty() => h,
            _ => return Err(StyleTransferError::Validation("no file provided".into())),
        };

        let base_name = handle
            .path
            .file_name()
            .ok_or_else(|| {
                StyleTransferError::Validation(format!(
                    "upload has no file name: {}",
                    handle.path.display()
                ))
            })?;

        if !handle.path.is_file() {
            return Err(StyleTransferError::NotFound(handle.path.display().to_string()));
        }

        std::fs::create_dir_all(&self.uploads_dir)?;
        let dest = self.uploads_dir.join(base_name);

        // 同一ファイルへのコピーは内容を壊すので飛ばす
        if !same_file(&handle.path, &dest) {
            std::fs::copy(&handle.path, &dest)?;
        }
        log::debug!("upload persisted: {} -> {}", handle.path.display(), dest.display());

        Ok(ResolvedInput {
            path: dest,
            is_temporary: true,
        })
    }
}

/// カタログ名はディレクトリを含まない単純なファイル名のみ
fn validate_file_name(file_name: &str) -> Result<()> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(StyleTransferError::Validation(format!(
            "invalid catalog image name: {:?}",
            file_name
        ))),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
