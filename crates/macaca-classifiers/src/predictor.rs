//! Predictor trait and common types

use image::DynamicImage;
use macaca_core::Result;

/// Trait for all image predictors
///
/// Implementations are shared read-only between concurrent requests, so
/// `predict` takes `&self` and must not rely on interior mutation for
/// correctness.
pub trait Predictor: Send + Sync {
    /// Produce a probability distribution over [`Predictor::labels`] for one image.
    ///
    /// The returned vector has the same length and ordering as `labels()`.
    fn predict(&self, image: &DynamicImage) -> Result<Vec<f32>>;

    /// Class labels in output-index order
    fn labels(&self) -> &[String];

    /// Get the predictor name
    fn name(&self) -> &str;

    /// Number of classes the predictor distinguishes
    fn num_classes(&self) -> usize {
        self.labels().len()
    }
}
