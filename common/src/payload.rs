//! 解析サービスの出力（生データ）
//!
//! フィールドはすべて省略可能。欠けている場合は空・0として扱う。

use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// 図面解析サービスのレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisPayload {
    /// クラス名 → 検出数（JSONの記述順を保持）
    pub symbols_per_class: Option<Map<String, Value>>,

    /// クラス名の一覧（null は空扱い）
    #[serde(deserialize_with = "null_as_empty")]
    pub classes: Vec<String>,

    /// 代表画像（`classes` と同じ添字で対応、null は空扱い）
    #[serde(deserialize_with = "null_as_empty")]
    pub images: Vec<Option<String>>,

    /// 総シンボル数
    pub total_symbols: Option<Value>,
}

impl AnalysisPayload {
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: Self = serde_json::from_str(json)?;
        Ok(payload)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 総シンボル数（欠損時は0）
    pub fn total_symbols(&self) -> u64 {
        self.total_symbols.as_ref().map(coerce_count).unwrap_or(0)
    }

    /// クラスごとの検出数（記述順）。マッピング自体が無ければ `None`
    pub fn class_counts(&self) -> Option<Vec<(&str, u64)>> {
        self.symbols_per_class.as_ref().map(|map| {
            map.iter()
                .map(|(name, value)| (name.as_str(), coerce_count(value)))
                .collect()
        })
    }

    /// クラス名 → 画像参照（添字対応、短い方の長さまで）
    ///
    /// 同じクラス名が複数あれば後の添字が優先される。
    pub fn image_lookup(&self) -> HashMap<&str, &str> {
        let mut lookup = HashMap::new();
        for (name, image) in self.classes.iter().zip(self.images.iter()) {
            match image.as_deref() {
                Some(image) => {
                    lookup.insert(name.as_str(), image);
                }
                None => {
                    lookup.remove(name.as_str());
                }
            }
        }
        lookup
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// 検出数を非負整数に変換する
///
/// 小数は切り捨て、負数・数値以外は0。
pub fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
