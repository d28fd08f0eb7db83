use macaca_classifiers::{InferenceAdapter, Predictor};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
///
/// Built once after startup completes and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Inference over the process-wide predictor
    pub inference: InferenceAdapter,

    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            inference: InferenceAdapter::new(predictor),
            metrics: None,
        }
    }

    /// Attach the Prometheus handle used by `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn predictor(&self) -> &Arc<dyn Predictor> {
        self.inference.predictor()
    }
}
