//! 見積書の表データ（PDF / Word / Excel 共通）

use crate::bill::format_money;
use crate::types::{EstimationSummary, UserDetails};
use rust_decimal::Decimal;

/// 見積書の列定義
#[derive(Debug, Clone, Copy)]
pub struct ColumnDefinition {
    pub key: &'static str,
    pub label: &'static str,
}

/// 明細表の列
pub const BILL_COLUMNS: &[ColumnDefinition] = &[
    ColumnDefinition { key: "name", label: "Symbol Name" },
    ColumnDefinition { key: "count", label: "Count" },
    ColumnDefinition { key: "price", label: "Price" },
    ColumnDefinition { key: "lineTotal", label: "Total Price" },
];

pub const TOTAL_LABEL: &str = "Overall Total";

/// 明細表の1行
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub count: u64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl ReportRow {
    /// 列キーに対応する表示文字列
    pub fn cell(&self, key: &str, currency_symbol: &str) -> String {
        match key {
            "name" => self.name.clone(),
            "count" => self.count.to_string(),
            "price" => format_money(self.unit_price, currency_symbol),
            "lineTotal" => format_money(self.line_total, currency_symbol),
            _ => "-".to_string(),
        }
    }
}

/// サマリーから作る見積書
#[derive(Debug, Clone)]
pub struct BillReport {
    pub title: String,
    pub date: String,
    pub contact: Vec<(&'static str, String)>,
    pub rows: Vec<ReportRow>,
    pub total: Decimal,
    pub currency_symbol: String,
}

impl BillReport {
    pub fn from_summary(summary: &EstimationSummary, title: &str, currency_symbol: &str) -> Self {
        let rows = summary
            .items()
            .iter()
            .map(|item| ReportRow {
                name: item.name.clone(),
                count: item.count,
                unit_price: item.price,
                line_total: item.line_total(),
            })
            .collect();

        Self {
            title: title.to_string(),
            date: summary.created_at().format("%Y-%m-%d").to_string(),
            contact: contact_fields(summary.user()),
            rows,
            total: summary.total(),
            currency_symbol: currency_symbol.to_string(),
        }
    }

    /// ヘッダー行のラベル
    pub fn header(&self) -> Vec<&'static str> {
        BILL_COLUMNS.iter().map(|c| c.label).collect()
    }

    /// 表示用の全セル（行 × 列）
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                BILL_COLUMNS
                    .iter()
                    .map(|c| row.cell(c.key, &self.currency_symbol))
                    .collect()
            })
            .collect()
    }

    pub fn total_text(&self) -> String {
        format_money(self.total, &self.currency_symbol)
    }
}

/// 連絡先欄（未入力は "-"）
pub fn contact_fields(user: &UserDetails) -> Vec<(&'static str, String)> {
    [
        ("Name", &user.name),
        ("Email", &user.email),
        ("Phone", &user.phone),
        ("Address", &user.address),
    ]
    .into_iter()
    .map(|(label, value)| {
        let value = value.trim();
        (label, if value.is_empty() { "-".to_string() } else { value.to_string() })
    })
    .collect()
}
