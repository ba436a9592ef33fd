//! 見積もりセッション
//!
//! 読み込み → 編集 → 保存（サマリー） → 出力 の状態遷移を管理する。
//! 新しい解析結果はどの状態からでも読み込める（保留中のサマリーは破棄）。

use crate::bill;
use crate::error::{Error, Result};
use crate::normalizer::{normalize_payload, NormalizationOptions, NormalizationStats};
use crate::payload::AnalysisPayload;
use crate::store::{EditOutcome, EstimationStore, StoreEvent};
use crate::summary;
use crate::types::{EstimationSummary, ExportFormat, LineItem, UserDetails};
use rust_decimal::Decimal;
use uuid::Uuid;

/// セッション状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
    Editing,
    Summarized,
    Exported,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Empty => write!(f, "empty"),
            SessionState::Loaded => write!(f, "loaded"),
            SessionState::Editing => write!(f, "editing"),
            SessionState::Summarized => write!(f, "summarized"),
            SessionState::Exported => write!(f, "exported"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EstimationSession {
    options: NormalizationOptions,
    store: EstimationStore,
    state: SessionState,
    summary: Option<EstimationSummary>,
}

impl Default for EstimationSession {
    fn default() -> Self {
        Self::new(NormalizationOptions::default())
    }
}

impl EstimationSession {
    pub fn new(options: NormalizationOptions) -> Self {
        Self {
            options,
            store: EstimationStore::new(),
            state: SessionState::Empty,
            summary: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn items(&self) -> &[LineItem] {
        self.store.items()
    }

    pub fn store(&self) -> &EstimationStore {
        &self.store
    }

    /// 直近に確定したサマリー
    pub fn summary(&self) -> Option<&EstimationSummary> {
        self.summary.as_ref()
    }

    pub fn billable_items(&self) -> Vec<&LineItem> {
        bill::billable_items(self.store.items())
    }

    pub fn total(&self) -> Decimal {
        bill::total(self.store.items())
    }

    /// 解析結果を読み込む（既存の明細とサマリーは破棄）
    pub fn load_payload(&mut self, payload: &AnalysisPayload) -> NormalizationStats {
        let result = normalize_payload(payload, &self.options);
        self.store.replace_all(result.items);
        self.summary = None;
        self.state = if self.store.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Loaded
        };
        tracing::debug!(state = %self.state, "payload loaded into session");
        result.stats
    }

    /// 名前で明細を更新する
    pub fn edit_by_name(&mut self, name: &str, count: u64, price: Decimal) -> EditOutcome {
        let outcome = self.store.edit_by_name(name, count, price);
        self.after_edit(outcome);
        outcome
    }

    /// IDで明細を更新する
    pub fn edit_by_id(&mut self, id: Uuid, count: u64, price: Decimal) -> EditOutcome {
        let outcome = self.store.edit_by_id(id, count, price);
        self.after_edit(outcome);
        outcome
    }

    fn after_edit(&mut self, outcome: EditOutcome) {
        if outcome.is_updated() && self.state != SessionState::Empty {
            self.state = SessionState::Editing;
        }
    }

    /// 保存確定。入力不備の場合は状態を変えずにエラーを返す
    pub fn summarize(&mut self, user: &UserDetails) -> Result<&EstimationSummary> {
        if self.state == SessionState::Empty {
            return Err(Error::InvalidTransition(
                "no analysis result has been loaded".to_string(),
            ));
        }
        let summary = summary::assemble(user, self.store.items())?;
        self.state = SessionState::Summarized;
        Ok(self.summary.insert(summary))
    }

    /// 出力可能なサマリー（状態は変えない）
    pub fn exportable_summary(&self) -> Result<&EstimationSummary> {
        let exportable = matches!(
            self.state,
            SessionState::Summarized | SessionState::Exported
        );
        match self.summary.as_ref() {
            Some(summary) if exportable => Ok(summary),
            _ => Err(Error::InvalidTransition(format!(
                "cannot export from {} state; save the estimation first",
                self.state
            ))),
        }
    }

    /// 出力完了を記録する。ファイルの書き出しが済んでから呼ぶ
    pub fn mark_exported(&mut self, format: ExportFormat) -> Result<&EstimationSummary> {
        let id = self.exportable_summary()?.id();
        self.state = SessionState::Exported;
        tracing::info!(%format, %id, "estimation exported");
        self.exportable_summary()
    }

    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.store.drain_events()
    }
}
