//! Mock predictors for testing
//!
//! Provides configurable mock implementations of the Predictor trait
//! for testing the inference adapter, ranking and error handling.

use image::{DynamicImage, Rgb, RgbImage};
use macaca_classifiers::{InferenceAdapter, Predictor};
use macaca_core::{AnalyzeResponse, Error, Result};
use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

const MACAQUES: [&str; 7] = [
    "macaca_arctoide",
    "macaca_fuscata",
    "macaca_nigra",
    "macaca_silenus",
    "macaca_sinica",
    "macaca_thibetana",
    "macaca_tonkeana",
];

/// A configurable mock predictor for testing
pub struct MockPredictor {
    labels: Vec<String>,
    probabilities: Vec<f32>,
    call_count: AtomicU32,
}

impl MockPredictor {
    /// Create a mock over the macaque label set with a flat distribution
    pub fn new() -> Self {
        let labels: Vec<String> = MACAQUES.iter().map(|s| s.to_string()).collect();
        let flat = 1.0 / labels.len() as f32;
        Self {
            probabilities: vec![flat; labels.len()],
            labels,
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the distribution this predictor returns for non-red images
    pub fn with_probabilities(mut self, probabilities: Vec<f32>) -> Self {
        self.probabilities = probabilities;
        self
    }

    /// Get the number of times predict was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Predictor for MockPredictor {
    fn predict(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        // Mostly-red images are "recognised" as Japanese macaques
        let rgb = image.to_rgb8();
        let pixels = rgb.pixels().len().max(1) as f32;
        let mean_red = rgb.pixels().map(|p| p[0] as f32).sum::<f32>() / pixels;
        let mean_green = rgb.pixels().map(|p| p[1] as f32).sum::<f32>() / pixels;

        if mean_red > 200.0 && mean_green < 100.0 {
            return Ok(vec![0.02, 0.86, 0.05, 0.01, 0.03, 0.02, 0.01]);
        }

        Ok(self.probabilities.clone())
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A predictor that always fails - for testing error paths
pub struct FailingPredictor {
    labels: Vec<String>,
}

impl FailingPredictor {
    pub fn new() -> Self {
        Self {
            labels: MACAQUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Predictor for FailingPredictor {
    fn predict(&self, _image: &DynamicImage) -> Result<Vec<f32>> {
        Err(Error::inference("Simulated forward pass failure"))
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn png_bytes(color: [u8; 3]) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb(color)));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn parse_percent(pred: &str) -> f64 {
    let start = pred.rfind('(').unwrap() + 1;
    let end = pred.rfind("%)").unwrap();
    pred[start..end].parse().unwrap()
}

#[tokio::test]
async fn test_reference_image_of_fuscata() {
    let adapter = InferenceAdapter::new(Arc::new(MockPredictor::new()));

    let top = adapter.analyze(png_bytes([230, 40, 40]).into()).await.unwrap();
    let response = AnalyzeResponse::try_from(&top).unwrap();

    assert!(response.pred_1.contains("macaca_fuscata"), "got {}", response.pred_1);
    assert_eq!(response.pred_1, "macaca_fuscata (86.00%)");
}

#[tokio::test]
async fn test_predictions_are_descending_and_bounded() {
    let predictor = MockPredictor::new()
        .with_probabilities(vec![0.05, 0.1, 0.4, 0.05, 0.3, 0.06, 0.04]);
    let adapter = InferenceAdapter::new(Arc::new(predictor));

    let top = adapter.analyze(png_bytes([10, 10, 10]).into()).await.unwrap();
    let response = AnalyzeResponse::try_from(&top).unwrap();

    let probs: Vec<f64> = [&response.pred_1, &response.pred_2, &response.pred_3]
        .iter()
        .map(|p| parse_percent(p))
        .collect();

    assert!(response.pred_1.starts_with("macaca_nigra"));
    assert!(response.pred_2.starts_with("macaca_sinica"));
    assert!(response.pred_3.starts_with("macaca_fuscata"));
    assert!(probs[0] >= probs[1] && probs[1] >= probs[2]);

    for pred in [&response.pred_1, &response.pred_2, &response.pred_3] {
        let value = parse_percent(pred);
        assert!((0.0..=100.0).contains(&value));
        let digits = pred.rsplit('.').next().unwrap().trim_end_matches("%)");
        assert_eq!(digits.len(), 2, "expected two decimals in {}", pred);
    }
}

#[tokio::test]
async fn test_predictor_called_once_per_image() {
    let predictor = Arc::new(MockPredictor::new());
    let adapter = InferenceAdapter::new(predictor.clone());

    adapter.analyze(png_bytes([0, 0, 255]).into()).await.unwrap();
    adapter.analyze(png_bytes([0, 255, 0]).into()).await.unwrap();

    assert_eq!(predictor.call_count(), 2);
}

#[tokio::test]
async fn test_undecodable_upload_is_client_error() {
    let predictor = Arc::new(MockPredictor::new());
    let adapter = InferenceAdapter::new(predictor.clone());

    let err = adapter
        .analyze(bytes_from(b"GIF89a but not really"))
        .await
        .unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(predictor.call_count(), 0);
}

#[tokio::test]
async fn test_failing_predictor() {
    let adapter = InferenceAdapter::new(Arc::new(FailingPredictor::new()));

    let err = adapter.analyze(png_bytes([1, 2, 3]).into()).await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[test]
fn test_distribution_length_mismatch() {
    let predictor = MockPredictor::new().with_probabilities(vec![0.5, 0.5]);
    let adapter = InferenceAdapter::new(Arc::new(predictor));

    assert!(adapter.classify(&png_bytes([5, 5, 5])).is_err());
}

#[test]
fn test_custom_top_k() {
    let adapter = InferenceAdapter::new(Arc::new(MockPredictor::new())).with_top_k(5);
    let top = adapter.classify(&png_bytes([5, 5, 5])).unwrap();
    assert_eq!(top.len(), 5);
}

fn bytes_from(data: &'static [u8]) -> bytes::Bytes {
    bytes::Bytes::from_static(data)
}
