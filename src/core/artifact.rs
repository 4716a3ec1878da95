//! Model artifacts understood by the gateway.
//!
//! Trained models ship as ONNX exports (see [`crate::core::onnx`]). A small
//! JSON stub is also accepted for fixtures and smoke runs:
//!
//! ```json
//! {"kind": "constant", "value": 210000.0, "feature_names": ["TimeToSubway", "..."]}
//! ```
//!
//! An optional `feature_names` list pins the column order the model was
//! trained with and is checked against [`ModelColumn::TRAINED_ORDER`] on load.

use crate::core::onnx::decode_onnx_artifact;
use crate::domain::model::EncodedRecord;
use crate::domain::ports::Regressor;
use crate::domain::schema::ModelColumn;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub model: StubModel,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StubModel {
    Constant { value: f64 },
}

impl ModelArtifact {
    /// Deserializes and checks an artifact. The error string becomes the
    /// reason of an `ArtifactCorruptError`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        let artifact: ModelArtifact =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid model JSON: {}", e))?;
        artifact.check_feature_names()?;
        Ok(artifact)
    }

    fn check_feature_names(&self) -> Result<(), String> {
        let Some(names) = &self.feature_names else {
            return Ok(());
        };
        let expected: Vec<&str> = ModelColumn::TRAINED_ORDER
            .iter()
            .map(|c| c.as_str())
            .collect();
        if names.iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(format!(
                "column order mismatch: artifact has [{}], encoder produces [{}]",
                names.join(", "),
                expected.join(", ")
            ));
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self.model {
            StubModel::Constant { .. } => "constant",
        }
    }
}

impl Regressor for ModelArtifact {
    fn predict(&self, _record: &EncodedRecord) -> Result<f64, String> {
        match &self.model {
            StubModel::Constant { value } => Ok(*value),
        }
    }
}

pub fn decode_json_artifact(bytes: &[u8]) -> Result<Arc<dyn Regressor>, String> {
    let artifact = ModelArtifact::from_bytes(bytes)?;
    tracing::debug!("Decoded '{}' model artifact", artifact.kind());
    Ok(Arc::new(artifact))
}

fn looks_like_json(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

/// Default [`ArtifactDecoder`](crate::core::gateway::ArtifactDecoder):
/// JSON stubs by their leading `{`, everything else as ONNX.
pub fn decode_model_artifact(bytes: &[u8]) -> Result<Arc<dyn Regressor>, String> {
    if looks_like_json(bytes) {
        decode_json_artifact(bytes)
    } else {
        decode_onnx_artifact(bytes)
    }
}
