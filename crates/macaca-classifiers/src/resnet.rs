//! ResNet image classifier backed by Candle

use crate::model_loader::ArtifactMetadata;
use crate::predictor::Predictor;
use crate::preprocess;
use candle_core::{Device, D};
use candle_nn::{Func, Module};
use image::DynamicImage;
use macaca_core::{Error, Result};
use std::time::Instant;
use tracing::debug;

/// A loaded ResNet ready for inference
pub struct ResnetPredictor {
    name: String,
    model: Func<'static>,
    device: Device,
    labels: Vec<String>,
    image_size: u32,
}

impl ResnetPredictor {
    pub fn new(name: String, model: Func<'static>, device: Device, metadata: ArtifactMetadata) -> Self {
        Self {
            name,
            model,
            device,
            labels: metadata.labels,
            image_size: metadata.image_size,
        }
    }

    /// Square input edge the network expects
    pub fn image_size(&self) -> u32 {
        self.image_size
    }
}

impl Predictor for ResnetPredictor {
    fn predict(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let start = Instant::now();

        let input = preprocess::to_tensor(image, self.image_size, &self.device)?;

        let probabilities = self
            .model
            .forward(&input)
            .and_then(|logits| candle_nn::ops::softmax(&logits, D::Minus1))
            .and_then(|probs| probs.squeeze(0))
            .and_then(|probs| probs.to_vec1::<f32>())
            .map_err(|e| Error::inference(format!("Forward pass failed: {}", e)))?;

        debug!(
            model = %self.name,
            latency_us = start.elapsed().as_micros() as u64,
            "forward pass complete"
        );

        Ok(probabilities)
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn name(&self) -> &str {
        &self.name
    }
}
