//! 同梱カタログ定義
//!
//! ドロップダウンの表示順はこの並び順に従う。

use crate::types::StyleOption;

/// アップロードを選ぶ特別な値
pub const CUSTOM_SOURCE: &str = "custom";

/// (id, 表示名)
const BUILTIN_STYLES: &[(&str, &str)] = &[
    ("candy", "Candy Style"),
    ("mosaic", "Mosaic Art"),
    ("rain_princess", "Rain Princess"),
    ("udnie", "Udnie Abstract"),
];

/// (ファイル名, 表示名)
const BUILTIN_CONTENTS: &[(&str, &str)] = &[
    ("amber.jpg", "Amber"),
    ("cat.png", "Cat"),
    ("room.jpg", "Room"),
    ("buildings.jpg", "Buildings"),
];

/// コンテンツ画像の選択肢
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentChoice {
    pub file_name: &'static str,
    pub label: &'static str,
}

pub fn builtin_styles() -> Vec<StyleOption> {
    BUILTIN_STYLES
        .iter()
        .map(|(id, label)| StyleOption::new(*id, *label))
        .collect()
}

/// カタログ画像 + 末尾に "Custom Upload"
pub fn builtin_contents() -> Vec<ContentChoice> {
    BUILTIN_CONTENTS
        .iter()
        .map(|&(file_name, label)| ContentChoice { file_name, label })
        .chain(std::iter::once(ContentChoice {
            file_name: CUSTOM_SOURCE,
            label: "Custom Upload",
        }))
        .collect()
}

pub fn content_label(file_name: &str) -> Option<&'static str> {
    builtin_contents()
        .into_iter()
        .find(|c| c.file_name == file_name)
        .map(|c| c.label)
}
