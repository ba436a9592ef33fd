use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("解析結果が空です（symbols_per_class がありません）: {0}")]
    EmptyPayload(String),

    #[error("明細が見つかりません: {0}")]
    ItemNotFound(String),

    #[error("保存済み見積もりが見つかりません: {0}")]
    SummaryNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("Word生成エラー: {0}")]
    DocxGeneration(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("入力エラー: {0}")]
    Dialog(#[from] dialoguer::Error),

    #[error(transparent)]
    Common(#[from] blueprint_estimate_common::Error),
}

pub type Result<T> = std::result::Result<T, EstimateError>;
