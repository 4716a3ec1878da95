use crate::core::artifact::decode_model_artifact;
use crate::domain::model::EncodedRecord;
use crate::domain::ports::{ArtifactStore, Regressor};
use crate::utils::error::GatewayError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

/// Turns artifact bytes into a scoring model. The error string is reported
/// as the reason of an `ArtifactCorruptError`.
pub type ArtifactDecoder = fn(&[u8]) -> Result<Arc<dyn Regressor>, String>;

type LoadOutcome = Result<Arc<dyn Regressor>, GatewayError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

/// Owns the model artifact for the lifetime of the process.
///
/// The first caller of [`ensure_loaded`](Self::ensure_loaded) or
/// [`predict`](Self::predict) reads and decodes the artifact; concurrent
/// callers wait on that single load and all observe its outcome. Both success
/// and failure are terminal: a failed gateway never retries.
pub struct ModelGateway<S: ArtifactStore> {
    store: Arc<S>,
    decoder: ArtifactDecoder,
    load_timeout: Duration,
    loading: AtomicBool,
    model: OnceCell<LoadOutcome>,
}

impl<S: ArtifactStore> ModelGateway<S> {
    pub fn new(store: S, load_timeout: Duration) -> Self {
        Self::with_decoder(store, load_timeout, decode_model_artifact)
    }

    pub fn with_decoder(store: S, load_timeout: Duration, decoder: ArtifactDecoder) -> Self {
        Self {
            store: Arc::new(store),
            decoder,
            load_timeout,
            loading: AtomicBool::new(false),
            model: OnceCell::new(),
        }
    }

    pub fn state(&self) -> GatewayState {
        match self.model.get() {
            Some(Ok(_)) => GatewayState::Ready,
            Some(Err(_)) => GatewayState::Failed,
            None if self.loading.load(Ordering::Acquire) => GatewayState::Loading,
            None => GatewayState::Uninitialized,
        }
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    pub async fn ensure_loaded(&self) -> Result<(), GatewayError> {
        self.model().await.map(|_| ())
    }

    pub async fn predict(&self, record: &EncodedRecord) -> Result<f64, GatewayError> {
        let model = self.model().await?;
        // A panicking model must not take the caller down with it.
        let scored = catch_unwind(AssertUnwindSafe(|| model.predict(record)))
            .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())));
        scored.map_err(|cause| {
            tracing::error!("❌ Inference failed: {}", cause);
            GatewayError::InferenceError { cause }
        })
    }

    async fn model(&self) -> LoadOutcome {
        self.model.get_or_init(|| self.load()).await.clone()
    }

    async fn load(&self) -> LoadOutcome {
        self.loading.store(true, Ordering::Release);
        let location = self.store.location();
        tracing::info!("Loading model artifact from {}", location);
        let started = Instant::now();

        let store = Arc::clone(&self.store);
        let decoder = self.decoder;
        let task = tokio::task::spawn_blocking(move || -> LoadOutcome {
            let bytes = store.read()?;
            decoder(&bytes).map_err(|reason| GatewayError::ArtifactCorruptError {
                path: store.location(),
                reason,
            })
        });

        // The blocking read cannot be interrupted; on timeout it is left to
        // finish in the background and its result is discarded.
        let outcome = match tokio::time::timeout(self.load_timeout, task).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => Err(GatewayError::LoadTaskError {
                message: join_error.to_string(),
            }),
            Err(_) => Err(GatewayError::LoadTimeoutError {
                timeout: self.load_timeout,
            }),
        };

        match &outcome {
            Ok(_) => tracing::info!(
                "✅ Model artifact loaded from {} in {}ms",
                location,
                started.elapsed().as_millis()
            ),
            Err(e) => tracing::error!("❌ Model artifact load failed: {}", e),
        }
        self.loading.store(false, Ordering::Release);
        outcome
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    format!("model panicked: {}", detail)
}
