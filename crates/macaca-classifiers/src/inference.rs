//! Inference adapter: raw upload bytes in, ranked predictions out

use crate::predictor::Predictor;
use crate::preprocess::decode_image;
use bytes::Bytes;
use image::DynamicImage;
use macaca_core::{Error, Result, TopPredictions, TOP_K};
use std::sync::Arc;

/// Runs a shared predictor over uploaded images
#[derive(Clone)]
pub struct InferenceAdapter {
    predictor: Arc<dyn Predictor>,
    top_k: usize,
}

impl InferenceAdapter {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            predictor,
            top_k: TOP_K,
        }
    }

    /// Keep a different number of ranked predictions
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn predictor(&self) -> &Arc<dyn Predictor> {
        &self.predictor
    }

    /// Classify an already decoded image
    pub fn classify_image(&self, image: &DynamicImage) -> Result<TopPredictions> {
        let probabilities = self.predictor.predict(image)?;
        TopPredictions::rank(self.predictor.labels(), &probabilities, self.top_k)
    }

    /// Decode and classify raw image bytes on the calling thread
    pub fn classify(&self, bytes: &[u8]) -> Result<TopPredictions> {
        let image = decode_image(bytes)?;
        self.classify_image(&image)
    }

    /// Decode and classify on the blocking pool so the forward pass does not
    /// stall the async runtime.
    pub async fn analyze(&self, bytes: Bytes) -> Result<TopPredictions> {
        let adapter = self.clone();
        tokio::task::spawn_blocking(move || adapter.classify(&bytes))
            .await
            .map_err(|e| Error::internal(format!("Inference task failed: {}", e)))?
    }
}
