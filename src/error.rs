use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleTransferError {
    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("inference engine error: {0}")]
    Engine(String),

    #[error("a style transfer is already running")]
    Busy,

    #[error("session is not running")]
    SessionClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] style_transfer_common::Error),
}

pub type Result<T> = std::result::Result<T, StyleTransferError>;

/// パイプラインのどの段階で失敗したか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    InputResolution,
    OutputPreparation,
    ModelLoad,
    Inference,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::InputResolution => write!(f, "input resolution"),
            PipelineStage::OutputPreparation => write!(f, "output preparation"),
            PipelineStage::ModelLoad => write!(f, "model load"),
            PipelineStage::Inference => write!(f, "inference"),
        }
    }
}

/// 失敗した段階と元のエラー
#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    pub source: Box<StyleTransferError>,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, source: StyleTransferError) -> Self {
        Self {
            stage,
            source: Box::new(source),
        }
    }

    pub fn cause(&self) -> &StyleTransferError {
        &self.source
    }

    /// UIに出す一行メッセージ
    pub fn user_message(&self) -> String {
        format!("Error processing image: {}", self.source)
    }
}
