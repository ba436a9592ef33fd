//! 請求集計
//!
//! 毎回明細から再計算する（合計はキャッシュしない）。

use crate::types::LineItem;
use rust_decimal::{Decimal, RoundingStrategy};

/// 請求対象の明細（単価 > 0）
pub fn billable_items(items: &[LineItem]) -> Vec<&LineItem> {
    items.iter().filter(|i| i.is_billable()).collect()
}

/// 請求合計（丸めない）。桁あふれ時は上限値で止める
pub fn total(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .filter(|i| i.is_billable())
        .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.line_total()))
}

/// 請求合計。桁あふれ時は `None`
pub fn checked_total(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .filter(|i| i.is_billable())
        .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.checked_line_total()?))
}

/// 表示用に小数2桁へ丸める
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// 通貨記号付きの表示
pub fn format_money(amount: Decimal, currency_symbol: &str) -> String {
    format!("{}{}", currency_symbol, format_amount(amount))
}
