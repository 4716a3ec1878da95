use std::time::Duration;
use thiserror::Error;

/// Failures raised while turning raw field values into an encoded record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("Invalid value for '{field}': {value} ({reason})")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },
}

/// Failures owned by the model gateway. Load-time and inference-time
/// failures are kept apart so callers can tell a broken deployment from a
/// model that rejected a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Model artifact not found at {path}")]
    ArtifactNotFoundError { path: String },

    #[error("Model artifact at {path} could not be loaded: {reason}")]
    ArtifactCorruptError { path: String, reason: String },

    #[error("Model artifact load exceeded {timeout:?}")]
    LoadTimeoutError { timeout: Duration },

    #[error("Model load task failed: {message}")]
    LoadTaskError { message: String },

    #[error("Inference failed: {cause}")]
    InferenceError { cause: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Prediction is not a finite number: {value}")]
pub struct FormatError {
    pub value: f64,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The user supplied a value outside the model's domain.
    Input,
    /// The caller broke the request contract.
    Caller,
    /// The model artifact is missing or unusable.
    Deployment,
    /// The model or its output misbehaved on a valid record.
    Model,
}

/// Tagged failure of a full prediction request. Each variant renders its
/// own message; only `Internal` falls back to a generic one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Validation failed for '{field}': {value} ({reason})")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Model artifact missing: {path}")]
    ArtifactMissing { path: String },

    #[error("Model artifact corrupt at {path}: {reason}")]
    ArtifactCorrupt { path: String, reason: String },

    #[error("Model load timed out after {timeout:?}")]
    LoadTimeout { timeout: Duration },

    #[error("Inference error: {cause}")]
    Inference { cause: String },

    #[error("Format error: prediction was {value}")]
    Format { value: f64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<EncodeError> for PipelineError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::ValidationError {
                field,
                value,
                reason,
            } => PipelineError::Validation {
                field,
                value,
                reason,
            },
            EncodeError::MissingFieldError { field } => PipelineError::MissingField { field },
        }
    }
}

impl From<GatewayError> for PipelineError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::ArtifactNotFoundError { path } => PipelineError::ArtifactMissing { path },
            GatewayError::ArtifactCorruptError { path, reason } => {
                PipelineError::ArtifactCorrupt { path, reason }
            }
            GatewayError::LoadTimeoutError { timeout } => PipelineError::LoadTimeout { timeout },
            GatewayError::LoadTaskError { message } => PipelineError::Internal { message },
            GatewayError::InferenceError { cause } => PipelineError::Inference { cause },
        }
    }
}

impl From<FormatError> for PipelineError {
    fn from(err: FormatError) -> Self {
        PipelineError::Format { value: err.value }
    }
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::Validation { .. } => ErrorCategory::Input,
            PipelineError::MissingField { .. } => ErrorCategory::Caller,
            PipelineError::ArtifactMissing { .. }
            | PipelineError::ArtifactCorrupt { .. }
            | PipelineError::LoadTimeout { .. } => ErrorCategory::Deployment,
            PipelineError::Inference { .. }
            | PipelineError::Format { .. }
            | PipelineError::Internal { .. } => ErrorCategory::Model,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PipelineError::Validation { .. } => ErrorSeverity::Low,
            PipelineError::LoadTimeout { .. } => ErrorSeverity::Medium,
            PipelineError::MissingField { .. }
            | PipelineError::Inference { .. }
            | PipelineError::Format { .. } => ErrorSeverity::High,
            PipelineError::ArtifactMissing { .. }
            | PipelineError::ArtifactCorrupt { .. }
            | PipelineError::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    /// Message shown to the person filling in the form.
    pub fn user_friendly_message(&self) -> String {
        match self {
            PipelineError::Validation { field, value, reason } => format!(
                "The value '{}' is not accepted for {}: {}.",
                value, field, reason
            ),
            PipelineError::MissingField { field } => {
                format!("The request did not include a value for {}.", field)
            }
            PipelineError::ArtifactMissing { path } => format!(
                "We couldn't find the prediction model. Please make sure '{}' is in the right place.",
                path
            ),
            PipelineError::ArtifactCorrupt { path, .. } => format!(
                "The prediction model at '{}' could not be read. It may be damaged or from an incompatible version.",
                path
            ),
            PipelineError::LoadTimeout { timeout } => format!(
                "The prediction model took longer than {:?} to load.",
                timeout
            ),
            PipelineError::Inference { cause } => format!(
                "The model could not produce a price for these details ({}).",
                cause
            ),
            PipelineError::Format { .. } => {
                "The model returned an unusable price for these details.".to_string()
            }
            PipelineError::Internal { message } => {
                format!("Something went wrong! Error: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PipelineError::Validation { .. } => "Pick one of the offered values and try again.",
            PipelineError::MissingField { .. } => {
                "Supply all ten apartment fields in the request."
            }
            PipelineError::ArtifactMissing { .. } => {
                "Check model.path in the configuration and deploy the model file there."
            }
            PipelineError::ArtifactCorrupt { .. } => {
                "Re-export the model artifact from the training pipeline."
            }
            PipelineError::LoadTimeout { .. } => {
                "Check the storage backing the model file, or raise model.load_timeout_seconds."
            }
            PipelineError::Inference { .. } => {
                "Verify the model was trained on the same columns and categories."
            }
            PipelineError::Format { .. } => "Inspect the model output for NaN or infinite values.",
            PipelineError::Internal { .. } => "Check the logs for the underlying cause.",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
