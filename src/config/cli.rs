use crate::config::PredictorConfig;
use crate::domain::model::{ApartmentFeatures, Record};
use crate::utils::error::ConfigError;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{validate_required_field, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "apt-price-predictor")]
#[command(about = "Estimate a Daegu apartment's market price from its features")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Path to the model artifact (overrides model.path)")]
    pub model: Option<PathBuf>,

    #[arg(long, help = "Read the apartment features from a JSON file")]
    pub input: Option<PathBuf>,

    #[arg(long, default_value = "500", help = "Total area (sq ft)")]
    pub size: i64,

    #[arg(long, default_value = "1978")]
    pub year_built: i64,

    #[arg(long, default_value = "Corridor")]
    pub hallway_type: String,

    #[arg(long, default_value = "0-5min")]
    pub time_to_subway: String,

    #[arg(long, default_value = "Bangoge")]
    pub subway_station: String,

    #[arg(long, default_value = "1")]
    pub num_facilities_in_apt: i64,

    #[arg(long, default_value = "0")]
    pub num_parking: i64,

    #[arg(long, default_value = "0")]
    pub num_universities: i64,

    #[arg(long, default_value = "0")]
    pub num_public_offices: i64,

    #[arg(long, default_value = "0")]
    pub num_other_facilities: i64,

    #[arg(long, help = "Print the result as JSON")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Write logs to stderr as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// 合併 TOML 配置與命令列參數，命令列的模型路徑優先
    pub fn predictor_config(&self) -> Result<PredictorConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => PredictorConfig::from_file(path)?,
            None => {
                let model = validate_required_field("model", &self.model)?;
                PredictorConfig::for_model(model)
            }
        };

        if let Some(model) = &self.model {
            config.model.path = model.display().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn log_format(&self) -> LogFormat {
        if self.log_json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }

    /// 未指定 --input 時以命令列欄位組成請求
    pub fn features(&self) -> ApartmentFeatures {
        ApartmentFeatures {
            size: self.size,
            year_built: self.year_built,
            hallway_type: self.hallway_type.clone(),
            time_to_subway: self.time_to_subway.clone(),
            subway_station: self.subway_station.clone(),
            num_facilities_in_apt: self.num_facilities_in_apt,
            num_parking: self.num_parking,
            num_universities: self.num_universities,
            num_public_offices: self.num_public_offices,
            num_other_facilities: self.num_other_facilities,
        }
    }

    /// JSON input is passed through untyped so the encoder reports wrong
    /// types and missing fields itself.
    pub fn request(&self) -> Result<Record, ConfigError> {
        match &self.input {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                let data =
                    serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
                        message: format!("Input JSON error: {}", e),
                    })?;
                Ok(Record { data })
            }
            None => Ok(self.features().into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_form() {
        let cli = CliConfig::parse_from(["apt-price-predictor", "--model", "final_model.json"]);
        let features = cli.features();

        assert_eq!(features.size, 500);
        assert_eq!(features.year_built, 1978);
        assert_eq!(features.hallway_type, "Corridor");
        assert_eq!(features.subway_station, "Bangoge");
        assert_eq!(cli.request().unwrap().data.len(), 10);
        assert_eq!(cli.log_format(), LogFormat::Compact);
    }

    #[test]
    fn test_log_json_flag() {
        let cli = CliConfig::parse_from([
            "apt-price-predictor",
            "--model",
            "final_model.onnx",
            "--log-json",
            "--verbose",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_model_flag_is_required_without_config() {
        let cli = CliConfig::parse_from(["apt-price-predictor"]);
        assert!(matches!(
            cli.predictor_config(),
            Err(ConfigError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_model_flag_overrides_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[model]\npath = \"from_file.json\"\nload_timeout_seconds = 7\n")
            .unwrap();
        let config_path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "apt-price-predictor",
            "--config",
            config_path.as_str(),
            "--model",
            "override.json",
        ]);
        let config = cli.predictor_config().unwrap();

        assert_eq!(config.model_path(), "override.json");
        assert_eq!(config.model.load_timeout_seconds, Some(7));
    }

    #[test]
    fn test_request_from_json_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(br#"{"size": 700, "hallway_type": "Terraced"}"#)
            .unwrap();
        let input_path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from(["apt-price-predictor", "--input", input_path.as_str()]);
        let record = cli.request().unwrap();

        assert_eq!(record.data.len(), 2);
        assert_eq!(record.data["size"], serde_json::json!(700));
    }
}
