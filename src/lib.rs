pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalArtifactStore;
pub use config::PredictorConfig;
pub use core::{
    encoder::FeatureEncoder, engine::PredictorEngine, formatter::ResultFormatter,
    gateway::{GatewayState, ModelGateway}, pipeline::PricePipeline,
};
pub use domain::model::{ApartmentFeatures, EncodedRecord, PredictionResult, Record};
pub use domain::ports::PredictionPipeline;
pub use domain::schema::{FeatureField, FeatureSchema, ModelColumn};
pub use utils::error::{PipelineError, Result};
