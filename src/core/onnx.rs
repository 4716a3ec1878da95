//! ONNX Runtime backed regressor for trained model exports.
//!
//! Tabular exports (e.g. skl2onnx with one initial type per DataFrame column)
//! declare one `[N, 1]` input per column. Each session input is bound to a
//! trained column by name; text columns feed `string` tensors and count
//! columns feed `int64`/`float` tensors. Inputs are always assembled in
//! [`ModelColumn::TRAINED_ORDER`].

use crate::domain::model::{EncodedRecord, FeatureValue};
use crate::domain::ports::Regressor;
use crate::domain::schema::ModelColumn;
use anyhow::Context;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::tensor::TensorElementType;
use ort::value::{DynValue, Tensor, ValueType};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Int64,
    Float32,
    Float64,
}

impl InputKind {
    fn from_element_type(ty: TensorElementType) -> Option<Self> {
        match ty {
            TensorElementType::String => Some(InputKind::Text),
            TensorElementType::Int64 => Some(InputKind::Int64),
            TensorElementType::Float32 => Some(InputKind::Float32),
            TensorElementType::Float64 => Some(InputKind::Float64),
            _ => None,
        }
    }
}

/// A session input bound to the trained column it receives.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInput {
    pub name: String,
    pub column: ModelColumn,
    pub kind: InputKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputTensor {
    Text(String),
    Int64(i64),
    Float32(f32),
    Float64(f64),
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn column_for_input(name: &str) -> Option<ModelColumn> {
    ModelColumn::from_name(name).or_else(|| {
        let wanted = normalize(name);
        ModelColumn::TRAINED_ORDER
            .iter()
            .copied()
            .find(|c| normalize(c.as_str()) == wanted)
    })
}

/// Binds declared session inputs to trained columns. Fails when the model
/// does not take exactly the ten trained columns, or when a text column is
/// wired to a numeric input (and vice versa).
pub fn bind_inputs(declared: &[(String, InputKind)]) -> Result<Vec<ColumnInput>, String> {
    let mut bound: Vec<ColumnInput> = Vec::with_capacity(declared.len());
    for (name, kind) in declared {
        let column = column_for_input(name)
            .ok_or_else(|| format!("model input '{}' matches no trained column", name))?;
        if bound.iter().any(|b| b.column == column) {
            return Err(format!("column '{}' is bound to more than one input", column));
        }
        let categorical = column.source_field().domain().is_categorical();
        if categorical != (*kind == InputKind::Text) {
            return Err(format!(
                "model input '{}' has type {:?}, incompatible with column '{}'",
                name, kind, column
            ));
        }
        bound.push(ColumnInput {
            name: name.clone(),
            column,
            kind: *kind,
        });
    }

    if let Some(missing) = ModelColumn::TRAINED_ORDER
        .iter()
        .find(|c| !bound.iter().any(|b| b.column == **c))
    {
        return Err(format!("model has no input for column '{}'", missing));
    }

    bound.sort_by_key(|b| {
        ModelColumn::TRAINED_ORDER
            .iter()
            .position(|c| *c == b.column)
            .unwrap_or(usize::MAX)
    });
    Ok(bound)
}

/// Values for each bound input, in trained column order.
pub fn input_values(
    bindings: &[ColumnInput],
    record: &EncodedRecord,
) -> Result<Vec<(String, InputTensor)>, String> {
    bindings
        .iter()
        .map(|binding| {
            let value = record
                .get(binding.column)
                .ok_or_else(|| format!("shape mismatch: record has no column '{}'", binding.column))?;
            let tensor = match (binding.kind, value) {
                (InputKind::Text, FeatureValue::Category(v)) => InputTensor::Text(v.clone()),
                (InputKind::Int64, FeatureValue::Integer(v)) => InputTensor::Int64(*v),
                (InputKind::Float32, FeatureValue::Integer(v)) => InputTensor::Float32(*v as f32),
                (InputKind::Float64, FeatureValue::Integer(v)) => InputTensor::Float64(*v as f64),
                (kind, other) => {
                    return Err(format!(
                        "input '{}' expects {:?}, got {:?}",
                        binding.name, kind, other
                    ))
                }
            };
            Ok((binding.name.clone(), tensor))
        })
        .collect()
}

fn to_dyn(tensor: InputTensor) -> anyhow::Result<DynValue> {
    let shape = vec![1_i64, 1];
    let value = match tensor {
        InputTensor::Text(v) => Tensor::<String>::from_string_array((shape, &[v][..]))?.into_dyn(),
        InputTensor::Int64(v) => Tensor::from_array((shape, vec![v]))?.into_dyn(),
        InputTensor::Float32(v) => Tensor::from_array((shape, vec![v]))?.into_dyn(),
        InputTensor::Float64(v) => Tensor::from_array((shape, vec![v]))?.into_dyn(),
    };
    Ok(value)
}

fn build_session(bytes: &[u8]) -> anyhow::Result<Session> {
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(1)?
        .commit_from_memory(bytes)
        .context("Failed to load ONNX model")?;
    Ok(session)
}

/// Loaded ONNX session. `Session::run` needs exclusive access, so scoring is
/// serialized through a mutex.
pub struct OnnxRegressor {
    session: Mutex<Session>,
    inputs: Vec<ColumnInput>,
    output_name: String,
}

impl OnnxRegressor {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        let session = build_session(bytes).map_err(|e| format!("invalid ONNX model: {:#}", e))?;

        let declared = session
            .inputs
            .iter()
            .map(|input| match &input.input_type {
                ValueType::Tensor { ty, .. } => InputKind::from_element_type(*ty)
                    .map(|kind| (input.name.clone(), kind))
                    .ok_or_else(|| {
                        format!("model input '{}' has unsupported type {:?}", input.name, ty)
                    }),
                other => Err(format!(
                    "model input '{}' is not a tensor ({:?})",
                    input.name, other
                )),
            })
            .collect::<Result<Vec<_>, String>>()?;
        let inputs = bind_inputs(&declared)?;

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("variable") || o.name.contains("output"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| "model declares no outputs".to_string())?;

        tracing::info!(
            "ONNX model bound {} inputs, reading output '{}'",
            inputs.len(),
            output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            inputs,
            output_name,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, record: &EncodedRecord) -> Result<f64, String> {
        let feeds = input_values(&self.inputs, record)?
            .into_iter()
            .map(|(name, tensor)| to_dyn(tensor).map(|value| (name, value)))
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| format!("failed to build input tensor: {:#}", e))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| "ONNX session lock poisoned by an earlier failure".to_string())?;
        let outputs = session
            .run(feeds)
            .map_err(|e| format!("ONNX session run failed: {}", e))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| format!("model produced no output '{}'", self.output_name))?;

        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            return data
                .first()
                .map(|v| *v as f64)
                .ok_or_else(|| "model output tensor is empty".to_string());
        }
        if let Ok((_, data)) = output.try_extract_tensor::<f64>() {
            return data
                .first()
                .copied()
                .ok_or_else(|| "model output tensor is empty".to_string());
        }
        Err(format!(
            "model output '{}' is not a float tensor",
            self.output_name
        ))
    }
}

/// [`ArtifactDecoder`](crate::core::gateway::ArtifactDecoder) for ONNX exports.
pub fn decode_onnx_artifact(bytes: &[u8]) -> Result<Arc<dyn Regressor>, String> {
    Ok(Arc::new(OnnxRegressor::from_bytes(bytes)?))
}
