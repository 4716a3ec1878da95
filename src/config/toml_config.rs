use crate::utils::error::ConfigError;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_LOAD_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_ACCURACY_PCT: f64 = 80.5;
pub const DEFAULT_AVG_ERROR_AMOUNT: f64 = 37816.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub metadata: ModelMetadata,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: String,
    pub load_timeout_seconds: Option<u64>,
}

/// 模型離線評估指標，隨結果一併顯示，不會依單次預測重新計算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default = "default_accuracy_pct")]
    pub accuracy_pct: f64,
    #[serde(default = "default_avg_error_amount")]
    pub avg_error_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,
    #[serde(default = "default_currency_suffix")]
    pub currency_suffix: String,
}

fn default_accuracy_pct() -> f64 {
    DEFAULT_ACCURACY_PCT
}

fn default_avg_error_amount() -> f64 {
    DEFAULT_AVG_ERROR_AMOUNT
}

fn default_currency_prefix() -> String {
    "💰 ".to_string()
}

fn default_currency_suffix() -> String {
    " ₩".to_string()
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            accuracy_pct: DEFAULT_ACCURACY_PCT,
            avg_error_amount: DEFAULT_AVG_ERROR_AMOUNT,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_prefix: default_currency_prefix(),
            currency_suffix: default_currency_suffix(),
        }
    }
}

impl PredictorConfig {
    /// 以模型路徑建立預設配置
    pub fn for_model<P: AsRef<Path>>(path: P) -> Self {
        Self {
            model: ModelConfig {
                path: path.as_ref().display().to_string(),
                load_timeout_seconds: None,
            },
            metadata: ModelMetadata::default(),
            display: DisplayConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        validation::validate_path("model.path", &self.model.path)?;

        if let Some(seconds) = self.model.load_timeout_seconds {
            validation::validate_range("model.load_timeout_seconds", seconds, 1, 3600)?;
        }

        validation::validate_finite("metadata.accuracy_pct", self.metadata.accuracy_pct)?;
        validation::validate_range(
            "metadata.accuracy_pct",
            self.metadata.accuracy_pct,
            0.0,
            100.0,
        )?;
        validation::validate_finite("metadata.avg_error_amount", self.metadata.avg_error_amount)?;
        validation::validate_range(
            "metadata.avg_error_amount",
            self.metadata.avg_error_amount,
            0.0,
            f64::MAX,
        )?;

        Ok(())
    }

    pub fn model_path(&self) -> &str {
        &self.model.path
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(
            self.model
                .load_timeout_seconds
                .unwrap_or(DEFAULT_LOAD_TIMEOUT_SECONDS),
        )
    }
}

impl Validate for PredictorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_config()
    }
}
