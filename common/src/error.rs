//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 必須項目が未入力（入力フォームは開いたままにする）
    #[error("Validation error: missing required field(s): {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    /// 金額が表現範囲を超えた（数量・単価を見直せば回復できる）
    #[error("Amount overflow: the bill total exceeds the supported range")]
    AmountOverflow,
}

impl Error {
    /// 入力の修正で回復できるエラーか
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Validation { .. } | Error::AmountOverflow)
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
