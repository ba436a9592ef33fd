//! 解析結果の正規化
//!
//! 解析サービスの生データを、先頭に集計行を持つ明細リストへ変換する。
//!
//! ## 処理フロー
//! 1. `classes` と `images` を添字で対応付け
//! 2. 除外クラス（door）をスキップ
//! 3. 残りのクラスに既定単価を設定
//! 4. 先頭に「Total Symbols」集計行を追加

use crate::payload::AnalysisPayload;
use crate::types::{LineItem, DEFAULT_UNIT_PRICE};
use rust_decimal::Decimal;

/// 明細化しないクラス（大文字小文字を区別しない）
pub const EXCLUDED_CLASSES: &[&str] = &["door"];

/// 正規化オプション
#[derive(Debug, Clone)]
pub struct NormalizationOptions {
    /// 検出クラスに設定する単価
    pub unit_price: Decimal,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self {
            unit_price: DEFAULT_UNIT_PRICE,
        }
    }
}

/// 正規化の統計情報
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    /// 入力のクラス数
    pub source_classes: usize,
    /// 除外したクラス名
    pub excluded: Vec<String>,
}

/// 正規化結果
#[derive(Debug, Clone)]
pub struct NormalizationResult {
    pub items: Vec<LineItem>,
    pub stats: NormalizationStats,
}

/// 除外対象のクラスか
pub fn is_excluded_class(name: &str) -> bool {
    EXCLUDED_CLASSES
        .iter()
        .any(|excluded| name.eq_ignore_ascii_case(excluded))
}

/// 生データを明細リストに変換する
///
/// `symbols_per_class` が無い場合は空リスト（未読み込み状態）を返す。
pub fn normalize_payload(
    payload: &AnalysisPayload,
    options: &NormalizationOptions,
) -> NormalizationResult {
    let Some(counts) = payload.class_counts() else {
        tracing::debug!("payload has no symbols_per_class; nothing to load");
        return NormalizationResult {
            items: Vec::new(),
            stats: NormalizationStats::default(),
        };
    };

    let images = payload.image_lookup();
    let mut stats = NormalizationStats {
        source_classes: counts.len(),
        ..Default::default()
    };

    let mut items = Vec::with_capacity(counts.len() + 1);
    items.push(LineItem::aggregate(payload.total_symbols()));

    for (name, count) in counts {
        if is_excluded_class(name) {
            tracing::debug!(class = name, "excluded class skipped");
            stats.excluded.push(name.to_string());
            continue;
        }
        let image = images.get(name).map(|s| s.to_string());
        items.push(LineItem::detected(name, count, options.unit_price, image));
    }

    tracing::info!(
        items = items.len(),
        excluded = stats.excluded.len(),
        "analysis payload normalized"
    );

    NormalizationResult { items, stats }
}

/// 既定オプションで正規化し、明細だけを返す
pub fn normalize(payload: &AnalysisPayload) -> Vec<LineItem> {
    normalize_payload(payload, &NormalizationOptions::default()).items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemKind, TOTAL_SYMBOLS_NAME};

    fn scenario_payload() -> AnalysisPayload {
        AnalysisPayload::from_json(
            r#"{
                "symbols_per_class": {"door": 2, "window": 5, "wall": 3},
                "classes": ["door", "window", "wall"],
                "images": ["/d.png", "/w.png", "/wa.png"],
                "total_symbols": 10
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_scenario_payload() {
        let items = normalize(&scenario_payload());
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].name, TOTAL_SYMBOLS_NAME);
        assert_eq!(items[0].count, 10);
        assert_eq!(items[0].price, Decimal::ZERO);
        assert_eq!(items[0].image_reference, None);
        assert_eq!(items[0].kind, ItemKind::Aggregate);

        assert_eq!(items[1].name, "window");
        assert_eq!(items[1].count, 5);
        assert_eq!(items[1].price, Decimal::ONE_HUNDRED);
        assert_eq!(items[1].image_reference.as_deref(), Some("/w.png"));

        assert_eq!(items[2].name, "wall");
        assert_eq!(items[2].count, 3);
        assert_eq!(items[2].image_reference.as_deref(), Some("/wa.png"));
    }

    #[test]
    fn test_door_excluded_any_case() {
        for door in ["door", "Door", "DOOR", "dOoR"] {
            let json = format!(
                r#"{{"symbols_per_class": {{"{}": 4, "window": 1}}, "total_symbols": 5}}"#,
                door
            );
            let result =
                normalize_payload(&AnalysisPayload::from_json(&json).unwrap(), &Default::default());
            assert!(result.items.iter().all(|i| !i.name.eq_ignore_ascii_case("door")));
            assert_eq!(result.stats.excluded, vec![door.to_string()]);
            assert_eq!(result.stats.source_classes, 2);
        }
    }

    #[test]
    fn test_doorway_is_not_excluded() {
        let payload =
            AnalysisPayload::from_json(r#"{"symbols_per_class": {"doorway": 1}}"#).unwrap();
        let items = normalize(&payload);
        assert_eq!(items[1].name, "doorway");
    }

    #[test]
    fn test_missing_mapping_yields_empty() {
        let payload = AnalysisPayload::from_json(
            r#"{"classes": ["window"], "images": ["/w.png"], "total_symbols": 3}"#,
        )
        .unwrap();
        assert!(normalize(&payload).is_empty());
    }

    #[test]
    fn test_missing_total_defaults_to_zero() {
        let payload = AnalysisPayload::from_json(r#"{"symbols_per_class": {}}"#).unwrap();
        let items = normalize(&payload);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, TOTAL_SYMBOLS_NAME);
        assert_eq!(items[0].count, 0);
    }

    #[test]
    fn test_configured_unit_price() {
        let options = NormalizationOptions {
            unit_price: Decimal::new(2550, 2),
        };
        let result = normalize_payload(&scenario_payload(), &options);
        assert!(result.items[1..].iter().all(|i| i.price == Decimal::new(2550, 2)));
        assert_eq!(result.items[0].price, Decimal::ZERO);
    }

    #[test]
    fn test_ids_are_unique() {
        let items = normalize(&scenario_payload());
        let ids: std::collections::HashSet<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), items.len());
    }
}
