//! Blueprint Estimate Common Library
//!
//! 図面解析結果 → 見積もり明細 → 請求集計 → 保存サマリー までのコア処理

pub mod types;
pub mod payload;
pub mod normalizer;
pub mod store;
pub mod bill;
pub mod summary;
pub mod session;
pub mod error;
pub mod export;

pub use types::{EstimationSummary, ExportFormat, ItemKind, LineItem, UserDetails};
pub use types::{is_valid_unit_price, DEFAULT_UNIT_PRICE, MAX_ITEM_COUNT, MAX_UNIT_PRICE, TOTAL_SYMBOLS_NAME};
pub use payload::AnalysisPayload;
pub use normalizer::{normalize, normalize_payload, NormalizationOptions, NormalizationStats};
pub use store::{EditOutcome, EstimationStore, StoreEvent};
pub use session::{EstimationSession, SessionState};
pub use error::{Error, Result};
