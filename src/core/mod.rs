pub mod artifact;
pub mod encoder;
pub mod engine;
pub mod formatter;
pub mod gateway;
pub mod onnx;
pub mod pipeline;

pub use crate::domain::model::{EncodedRecord, FeatureValue, PredictionResult, Record};
pub use crate::domain::ports::{ArtifactStore, PredictionPipeline, Regressor};
pub use crate::utils::error::Result;
