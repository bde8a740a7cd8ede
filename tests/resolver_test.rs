//! 入力画像解決のテスト

mod support;

use style_transfer::error::StyleTransferError;
use style_transfer_common::{builtin_contents, ContentSource, UploadHandle, CUSTOM_SOURCE};
use support::{count_files, Fixture};

/// カタログ画像は実在パスを返し、一時ファイル扱いにならない
#[test]
fn test_catalog_resolves_existing_non_temporary_path() {
    let fx = Fixture::new();
    let resolver = fx.resolver();

    for name in ["amber.jpg", "cat.png", "room.jpg"] {
        let resolved = resolver
            .resolve(&ContentSource::Catalog(name.to_string()))
            .expect("カタログ画像の解決に失敗");
        assert!(resolved.path.exists());
        assert!(!resolved.is_temporary);
        assert_eq!(resolved.path, fx.layout.content_images.join(name));
    }
}

/// 同梱リストにあってもファイルがなければ NotFound
#[test]
fn test_catalog_missing_file_not_found() {
    let fx = Fixture::new();
    let missing = builtin_contents()
        .into_iter()
        .find(|c| c.file_name == "buildings.jpg")
        .unwrap();

    let err = fx
        .resolver()
        .resolve(&ContentSource::Catalog(missing.file_name.to_string()))
        .unwrap_err();
    assert!(matches!(err, StyleTransferError::NotFound(_)));
}

#[test]
fn test_catalog_rejects_traversal() {
    let fx = Fixture::new();
    let err = fx
        .resolver()
        .resolve(&ContentSource::Catalog("../style-images/candy.jpg".into()))
        .unwrap_err();
    assert!(matches!(err, StyleTransferError::Validation(_)));
}

/// 空のアップロードは ValidationError で、何も書き込まない
#[test]
fn test_custom_empty_is_validation_error_without_write() {
    let fx = Fixture::new();
    let resolver = fx.resolver();

    for source in [
        ContentSource::Custom(None),
        ContentSource::Custom(Some(UploadHandle::new(""))),
        ContentSource::from_choice(CUSTOM_SOURCE),
    ] {
        let err = resolver.resolve(&source).unwrap_err();
        match err {
            StyleTransferError::Validation(message) => assert_eq!(message, "no file provided"),
            other => panic!("ValidationError expected, got {:?}", other),
        }
    }

    assert!(!fx.layout.uploads.exists(), "アップロードディレクトリが作成された");
}

/// アップロードは1ファイルだけ、同じ内容で保存される
#[test]
fn test_custom_upload_copies_bytes() {
    let fx = Fixture::new();
    let source_path = fx.external_image("portrait.png");
    let original = std::fs::read(&source_path).unwrap();

    let resolved = fx
        .resolver()
        .resolve(&ContentSource::Custom(Some(UploadHandle::new(&source_path))))
        .expect("アップロードの保存に失敗");

    assert!(resolved.is_temporary);
    assert_eq!(resolved.path, fx.layout.uploads.join("portrait.png"));
    assert_eq!(std::fs::read(&resolved.path).unwrap(), original);
    assert_eq!(count_files(&fx.layout.uploads), 1);
}

/// 同名アップロードは後勝ちで上書き
#[test]
fn test_custom_upload_same_name_overwrites() {
    let fx = Fixture::new();
    let first = fx.dir.path().join("a").join("photo.jpg");
    let second = fx.dir.path().join("b").join("photo.jpg");
    std::fs::create_dir_all(first.parent().unwrap()).unwrap();
    std::fs::create_dir_all(second.parent().unwrap()).unwrap();
    std::fs::write(&first, b"first upload").unwrap();
    std::fs::write(&second, b"second upload").unwrap();

    let resolver = fx.resolver();
    resolver
        .resolve(&ContentSource::Custom(Some(UploadHandle::new(&first))))
        .unwrap();
    let resolved = resolver
        .resolve(&ContentSource::Custom(Some(UploadHandle::new(&second))))
        .unwrap();

    assert_eq!(std::fs::read(&resolved.path).unwrap(), b"second upload");
    assert_eq!(count_files(&fx.layout.uploads), 1);
}

#[test]
fn test_custom_upload_missing_source() {
    let fx = Fixture::new();
    let err = fx
        .resolver()
        .resolve(&ContentSource::Custom(Some(UploadHandle::new(
            fx.dir.path().join("gone.jpg"),
        ))))
        .unwrap_err();

    assert!(matches!(err, StyleTransferError::NotFound(_)));
    assert!(!fx.layout.uploads.exists());
}
