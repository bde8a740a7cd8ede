//! Style Transfer Common Library
//!
//! CLIと対話UIで共有される型・カタログ定義・ディレクトリ構成

pub mod types;
pub mod catalog;
pub mod layout;
pub mod error;

pub use types::{ContentSource, PipelineResult, ResolvedInput, StyleOption, UploadHandle};
pub use catalog::{builtin_contents, builtin_styles, content_label, ContentChoice, CUSTOM_SOURCE};
pub use layout::DirectoryLayout;
pub use error::{Error, Result};
