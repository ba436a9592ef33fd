//! 見積もりサマリーの組み立て
//!
//! 保存確定時に明細と連絡先からスナップショットを作る。ストアは変更しない。

use crate::bill;
use crate::error::{Error, Result};
use crate::types::{EstimationSummary, LineItem, UserDetails};
use chrono::{DateTime, Utc};

/// 現在時刻でサマリーを作る
pub fn assemble(user: &UserDetails, items: &[LineItem]) -> Result<EstimationSummary> {
    assemble_at(user, items, Utc::now())
}

/// 指定時刻でサマリーを作る
///
/// name / email が空なら `Error::Validation`、合計が桁あふれすれば
/// `Error::AmountOverflow` を返し、何も生成しない。
pub fn assemble_at(
    user: &UserDetails,
    items: &[LineItem],
    created_at: DateTime<Utc>,
) -> Result<EstimationSummary> {
    let missing = user.missing_required();
    if !missing.is_empty() {
        tracing::debug!(?missing, "summary rejected");
        return Err(Error::Validation { missing });
    }

    let total = bill::checked_total(items).ok_or_else(|| {
        tracing::warn!("summary rejected: bill total overflow");
        Error::AmountOverflow
    })?;
    let billable: Vec<LineItem> = bill::billable_items(items).into_iter().cloned().collect();

    let summary = EstimationSummary::new(user.clone(), billable, total, created_at);
    tracing::info!(
        id = %summary.id(),
        items = summary.items().len(),
        total = %summary.total(),
        "estimation summary assembled"
    );
    Ok(summary)
}
