//! 見積もりの型定義
//!
//! CLIとエクスポートで共有される型:
//! - LineItem: 検出クラス1件分の明細（数量・単価）
//! - UserDetails: 見積もり保存時の連絡先
//! - EstimationSummary: 保存確定時のスナップショット（不変）
//! - ExportFormat: 出力形式（pdf/docx/xlsx）

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 集計行の名称
pub const TOTAL_SYMBOLS_NAME: &str = "Total Symbols";

/// 単価のデフォルト値
pub const DEFAULT_UNIT_PRICE: Decimal = Decimal::ONE_HUNDRED;

/// 入力できる単価の上限（1兆）
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// 入力できる数量の上限
pub const MAX_ITEM_COUNT: u64 = 1_000_000_000_000;

/// 入力値として受け付ける単価か（0以上、上限以下）
pub fn is_valid_unit_price(price: Decimal) -> bool {
    price >= Decimal::ZERO && price <= MAX_UNIT_PRICE
}

/// 明細の種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    /// 総シンボル数の集計行（請求対象外）
    Aggregate,
    /// 検出されたクラス
    #[default]
    Detected,
}

/// 明細1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// 正規化時に採番される一意キー
    pub id: Uuid,

    pub name: String,

    pub count: u64,

    /// 単価（0は請求対象外）
    pub price: Decimal,

    /// 代表画像への参照（ベースURLは表示側が持つ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,

    #[serde(default)]
    pub kind: ItemKind,
}

impl LineItem {
    pub fn detected(
        name: impl Into<String>,
        count: u64,
        price: Decimal,
        image_reference: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            count,
            price,
            image_reference,
            kind: ItemKind::Detected,
        }
    }

    /// 総シンボル数の集計行
    pub fn aggregate(count: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: TOTAL_SYMBOLS_NAME.to_string(),
            count,
            price: Decimal::ZERO,
            image_reference: None,
            kind: ItemKind::Aggregate,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        self.kind == ItemKind::Aggregate
    }

    /// 請求対象か（単価 > 0 かつ集計行でない）
    pub fn is_billable(&self) -> bool {
        !self.is_aggregate() && self.price > Decimal::ZERO
    }

    /// 小計（丸めない）。桁あふれ時は `None`
    pub fn checked_line_total(&self) -> Option<Decimal> {
        Decimal::from(self.count).checked_mul(self.price)
    }

    /// 表示用の小計。桁あふれ時は上限値で止める
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.count).saturating_mul(self.price)
    }
}

/// 連絡先
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl UserDetails {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// 未入力の必須項目（name, email）
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        missing
    }
}

/// 保存確定時のスナップショット
///
/// `summary::assemble` でのみ生成され、生成後は変更できない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationSummary {
    id: Uuid,
    user: UserDetails,
    items: Vec<LineItem>,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl EstimationSummary {
    pub(crate) fn new(
        user: UserDetails,
        items: Vec<LineItem>,
        total: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            items,
            total,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &UserDetails {
        &self.user
    }

    /// 請求対象の明細のみ
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Docx,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Xlsx];

    /// ファイル拡張子
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "Word",
            ExportFormat::Xlsx => "Excel",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" | "word" => Ok(ExportFormat::Docx),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            _ => Err(format!("Unknown format: {}. Use pdf, docx, or xlsx", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_is_never_billable() {
        let mut item = LineItem::aggregate(10);
        assert_eq!(item.name, TOTAL_SYMBOLS_NAME);
        assert_eq!(item.price, Decimal::ZERO);
        assert!(!item.is_billable());

        item.price = Decimal::new(50, 0);
        assert!(!item.is_billable());
    }

    #[test]
    fn test_line_total_keeps_precision() {
        let item = LineItem::detected("window", 3, Decimal::new(3333, 3), None);
        assert_eq!(item.line_total(), Decimal::new(9999, 3));
        assert!(item.is_billable());
    }

    #[test]
    fn test_line_total_overflow() {
        let item = LineItem::detected(
            "window",
            10_000_000_000,
            Decimal::from(10_000_000_000_000_000_000u64),
            None,
        );
        assert_eq!(item.checked_line_total(), None);
        assert_eq!(item.line_total(), Decimal::MAX);
    }

    #[test]
    fn test_unit_price_range() {
        assert!(is_valid_unit_price(Decimal::ZERO));
        assert!(is_valid_unit_price(MAX_UNIT_PRICE));
        assert_eq!(MAX_UNIT_PRICE, Decimal::from(1_000_000_000_000u64));
        assert!(!is_valid_unit_price(MAX_UNIT_PRICE + Decimal::ONE));
        assert!(!is_valid_unit_price(Decimal::NEGATIVE_ONE));
    }

    #[test]
    fn test_missing_required() {
        assert_eq!(UserDetails::default().missing_required(), vec!["name", "email"]);
        assert_eq!(UserDetails::new("  ", "a@b.com").missing_required(), vec!["name"]);
        assert!(UserDetails::new("A", "a@b.com").missing_required().is_empty());
    }

    #[test]
    fn test_line_item_serialize() {
        let item = LineItem::detected("window", 5, DEFAULT_UNIT_PRICE, Some("/w.png".into()));
        let json = serde_json::to_string(&item).expect("シリアライズ失敗");
        assert!(json.contains("\"imageReference\":\"/w.png\""));
        assert!(json.contains("\"kind\":\"detected\""));

        let aggregate = serde_json::to_string(&LineItem::aggregate(1)).expect("シリアライズ失敗");
        assert!(!aggregate.contains("imageReference"));
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("word".parse::<ExportFormat>(), Ok(ExportFormat::Docx));
        assert_eq!("excel".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert!("csv".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Xlsx.to_string(), "xlsx");
    }
}
