use crate::core::{PredictionPipeline, PredictionResult, Record};
use crate::utils::error::Result;
use std::time::Instant;

/// Front door for the form: runs one request through the pipeline and logs
/// its outcome.
pub struct PredictorEngine<P: PredictionPipeline> {
    pipeline: P,
}

impl<P: PredictionPipeline> PredictorEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self, raw: &Record) -> Result<PredictionResult> {
        let started = Instant::now();
        tracing::info!("Starting price prediction ({} fields supplied)", raw.data.len());

        match self.pipeline.run_prediction(raw).await {
            Ok(result) => {
                tracing::info!(
                    "✅ Predicted {} (raw {:.2}) in {}ms",
                    result.formatted_value,
                    result.raw_value,
                    started.elapsed().as_millis()
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(
                    "❌ Prediction failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                Err(e)
            }
        }
    }
}
