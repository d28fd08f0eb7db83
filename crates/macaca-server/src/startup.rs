//! Two-phase startup: fetch the artifact, then load the predictor.
//!
//! Both phases complete before a listener is constructed. Either failure is
//! fatal; there is no partially available mode.

use crate::config::ServerConfig;
use macaca_classifiers::{load_predictor, ArtifactFetcher, FetchOutcome, Predictor};
use std::sync::Arc;
use tracing::info;

/// Fatal startup failure
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The artifact could not be downloaded or written
    #[error("failed to fetch model artifact")]
    Fetch(#[source] macaca_core::Error),

    /// The artifact could not be turned into a predictor
    #[error("failed to load model")]
    Load(#[source] macaca_core::Error),
}

/// Phase one: make sure the artifact is on disk
pub async fn fetch_phase(config: &ServerConfig) -> Result<FetchOutcome, StartupError> {
    ArtifactFetcher::new()
        .ensure(&config.model_url, &config.artifact_path())
        .await
        .map_err(StartupError::Fetch)
}

/// Phase two: deserialize the cached artifact
pub async fn load_phase(config: &ServerConfig) -> Result<Arc<dyn Predictor>, StartupError> {
    let dir = config.model_dir.clone();
    let file = config.model_file.clone();
    let device = config.device;

    let predictor = tokio::task::spawn_blocking(move || load_predictor(&dir, &file, device))
        .await
        .map_err(|e| StartupError::Load(macaca_core::Error::internal(e.to_string())))?
        .map_err(StartupError::Load)?;

    info!(
        model = predictor.name(),
        classes = predictor.num_classes(),
        device = %config.device,
        "Predictor loaded"
    );

    Ok(Arc::new(predictor))
}

/// Run both phases in order
pub async fn initialize(config: &ServerConfig) -> Result<Arc<dyn Predictor>, StartupError> {
    match fetch_phase(config).await? {
        FetchOutcome::AlreadyPresent => info!("Using cached artifact {}", config.artifact_path().display()),
        FetchOutcome::Downloaded { bytes } => info!("Fetched artifact ({} bytes)", bytes),
    }

    load_phase(config).await
}
