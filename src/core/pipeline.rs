use crate::config::PredictorConfig;
use crate::core::encoder::FeatureEncoder;
use crate::core::formatter::ResultFormatter;
use crate::core::gateway::ModelGateway;
use crate::core::{ArtifactStore, EncodedRecord, PredictionPipeline, PredictionResult, Record};
use crate::utils::error::Result;

/// Encode → predict → format against a single owned model gateway.
pub struct PricePipeline<S: ArtifactStore> {
    encoder: FeatureEncoder,
    gateway: ModelGateway<S>,
    formatter: ResultFormatter,
}

impl<S: ArtifactStore> PricePipeline<S> {
    pub fn new(gateway: ModelGateway<S>, formatter: ResultFormatter) -> Self {
        Self {
            encoder: FeatureEncoder::new(),
            gateway,
            formatter,
        }
    }

    pub fn from_config(store: S, config: &PredictorConfig) -> Self {
        Self::new(
            ModelGateway::new(store, config.load_timeout()),
            ResultFormatter::new(config.display.clone(), config.metadata.clone()),
        )
    }

    pub fn gateway(&self) -> &ModelGateway<S> {
        &self.gateway
    }

    /// Loads the model ahead of the first request.
    pub async fn warm_up(&self) -> Result<()> {
        self.gateway.ensure_loaded().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: ArtifactStore> PredictionPipeline for PricePipeline<S> {
    fn encode(&self, raw: &Record) -> Result<EncodedRecord> {
        Ok(self.encoder.encode(raw)?)
    }

    async fn predict(&self, record: &EncodedRecord) -> Result<f64> {
        self.gateway.ensure_loaded().await?;
        Ok(self.gateway.predict(record).await?)
    }

    fn format(&self, raw_value: f64) -> Result<PredictionResult> {
        Ok(self.formatter.format(raw_value)?)
    }
}
