use crate::error::{EstimateError, Result};
use blueprint_estimate_common::{
    is_valid_unit_price, ExportFormat, NormalizationOptions, DEFAULT_UNIT_PRICE, MAX_UNIT_PRICE,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const IMAGE_BASE_URL_ENV: &str = "BP_ESTIMATE_IMAGE_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 検出クラスの既定単価
    pub unit_price: Decimal,
    /// 画像参照の解決先（解析サービス）
    pub image_base_url: String,
    pub currency_symbol: String,
    /// 保存済み見積もりの置き場所（未設定ならデータディレクトリ）
    pub archive_dir: Option<PathBuf>,
    pub default_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            config
        } else {
            Self::default_config()
        };

        // 環境変数を優先
        if let Ok(url) = std::env::var(IMAGE_BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.image_base_url = url;
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| EstimateError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("blueprint-estimate").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            unit_price: DEFAULT_UNIT_PRICE,
            image_base_url: "http://127.0.0.1:5000".into(),
            currency_symbol: "$".into(),
            archive_dir: None,
            default_format: ExportFormat::Pdf,
        }
    }

    /// 保存済み見積もりのディレクトリ
    pub fn archive_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.archive_dir {
            return Ok(dir.clone());
        }
        let data = dirs::data_dir()
            .ok_or_else(|| EstimateError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("blueprint-estimate").join("estimates"))
    }

    pub fn normalization_options(&self) -> NormalizationOptions {
        NormalizationOptions {
            unit_price: self.unit_price,
        }
    }

    /// 設定値の範囲チェック
    pub fn validate(&self) -> Result<()> {
        check_unit_price(self.unit_price)
    }

    pub fn set_unit_price(&mut self, price: Decimal) -> Result<()> {
        check_unit_price(price)?;
        self.unit_price = price;
        self.save()
    }

    pub fn set_image_base_url(&mut self, url: String) -> Result<()> {
        self.image_base_url = url;
        self.save()
    }

    pub fn set_archive_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.archive_dir = Some(dir);
        self.save()
    }
}

fn check_unit_price(price: Decimal) -> Result<()> {
    if !is_valid_unit_price(price) {
        return Err(EstimateError::Config(format!(
            "単価は0以上{}以下で指定してください: {}",
            MAX_UNIT_PRICE, price
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.unit_price, Decimal::ONE_HUNDRED);
        assert_eq!(config.image_base_url, "http://127.0.0.1:5000");
        assert_eq!(config.default_format, ExportFormat::Pdf);
        assert_eq!(config.normalization_options().unit_price, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_partial_config_file() {
        let config: Config = serde_json::from_str(r#"{"unit_price": "75.5"}"#).unwrap();
        assert_eq!(config.unit_price, Decimal::new(755, 1));
        assert_eq!(config.currency_symbol, "$");
        assert!(config.archive_dir.is_none());
    }

    #[test]
    fn test_explicit_archive_dir() {
        let config = Config {
            archive_dir: Some(PathBuf::from("/tmp/estimates")),
            ..Default::default()
        };
        assert_eq!(config.archive_dir().unwrap(), PathBuf::from("/tmp/estimates"));
    }

    #[test]
    fn test_unit_price_range() {
        assert!(check_unit_price(Decimal::ZERO).is_ok());
        assert!(check_unit_price(Decimal::from(10_000_000_000_000_000_000u64)).is_err());
        assert!(check_unit_price(Decimal::NEGATIVE_ONE).is_err());

        let config: Config =
            serde_json::from_str(r#"{"unit_price": "10000000000000000000"}"#).unwrap();
        assert!(matches!(config.validate(), Err(EstimateError::Config(_))));
    }
}
