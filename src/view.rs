//! 端末表示
//!
//! 見積もりカード・請求表・保存前プレビューの文字列を組み立てる。
//! 画像参照は設定のベースURLで解決する。

use blueprint_estimate_common::bill::{self, format_money};
use blueprint_estimate_common::{EstimationSummary, LineItem, StoreEvent};

/// 画像参照をURLに解決する
pub fn resolve_image_url(base_url: &str, reference: Option<&str>) -> Option<String> {
    let reference = reference?.trim();
    if reference.is_empty() {
        return None;
    }
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Some(reference.to_string());
    }
    let base = base_url.trim_end_matches('/');
    if reference.starts_with('/') {
        Some(format!("{}{}", base, reference))
    } else {
        Some(format!("{}/{}", base, reference))
    }
}

/// 見積もりカード（名前と数量）
pub fn render_cards(items: &[LineItem]) -> String {
    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        out.push_str(&format!(
            "  [{:>2}] {:<24} {:>6}\n",
            index + 1,
            item.name.to_uppercase(),
            item.count
        ));
    }
    out
}

/// 請求表（請求対象のみ + 合計）
pub fn render_bill(items: &[LineItem], currency_symbol: &str) -> String {
    let billable = bill::billable_items(items);
    let mut out = String::new();
    out.push_str(&format!(
        "  {:<24} {:>6} {:>12} {:>14}\n",
        "Symbol Name", "Count", "Price", "Total Price"
    ));
    out.push_str(&format!("  {}\n", "-".repeat(59)));
    for item in &billable {
        out.push_str(&format!(
            "  {:<24} {:>6} {:>12} {:>14}\n",
            item.name,
            item.count,
            format_money(item.price, currency_symbol),
            format_money(item.line_total(), currency_symbol)
        ));
    }
    out.push_str(&format!("  {}\n", "-".repeat(59)));
    out.push_str(&format!(
        "  {:>44} {:>14}\n",
        "Overall Total",
        format_money(bill::total(items), currency_symbol)
    ));
    out
}

/// 保存前のプレビュー行（`count × $price  $line`）
pub fn render_summary_lines(items: &[LineItem], currency_symbol: &str) -> Vec<String> {
    bill::billable_items(items)
        .into_iter()
        .map(|item| {
            format!(
                "{}: {} × {} = {}",
                item.name,
                item.count,
                format_money(item.price, currency_symbol),
                format_money(item.line_total(), currency_symbol)
            )
        })
        .collect()
}

/// 保存済み見積もりの1行表示
pub fn render_summary_row(summary: &EstimationSummary, currency_symbol: &str) -> String {
    let id = summary.id().to_string();
    format!(
        "{}  {}  {:<20} {:<28} {:>14}",
        &id[..8],
        summary.created_at().format("%Y-%m-%d"),
        summary.user().name,
        summary.user().email,
        format_money(summary.total(), currency_symbol)
    )
}

/// ストアのイベントを通知メッセージにする
pub fn event_message(event: &StoreEvent) -> String {
    match event {
        StoreEvent::Replaced { items } => format!("✔ {}件の明細を読み込みました", items),
        StoreEvent::ItemUpdated { name, .. } => format!("✔ {} を更新しました", name),
    }
}
