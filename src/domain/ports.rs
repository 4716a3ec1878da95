use crate::domain::model::{EncodedRecord, PredictionResult, Record};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;

/// Backing store for the serialized model. Reads are blocking and happen at
/// most once per gateway.
pub trait ArtifactStore: Send + Sync + 'static {
    /// Human-readable location used in error messages and logs.
    fn location(&self) -> String;
    fn read(&self) -> std::result::Result<Vec<u8>, GatewayError>;
}

/// A loaded model. Scoring takes `&self`, so a loaded model can be shared
/// across concurrent requests without locking.
pub trait Regressor: Send + Sync {
    fn predict(&self, record: &EncodedRecord) -> std::result::Result<f64, String>;
}

#[async_trait]
pub trait PredictionPipeline: Send + Sync {
    fn encode(&self, raw: &Record) -> Result<EncodedRecord>;
    async fn predict(&self, record: &EncodedRecord) -> Result<f64>;
    fn format(&self, raw_value: f64) -> Result<PredictionResult>;

    async fn run_prediction(&self, raw: &Record) -> Result<PredictionResult> {
        let record = self.encode(raw)?;
        let raw_value = self.predict(&record).await?;
        self.format(raw_value)
    }
}
