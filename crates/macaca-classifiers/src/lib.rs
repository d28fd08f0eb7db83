//! Macaca Classifiers
//!
//! Everything between a remote model artifact and a ranked prediction:
//! - [`artifact`]: download the artifact once, skip if already on disk
//! - [`model_loader`]: turn a SafeTensors artifact into a [`ResnetPredictor`]
//! - [`preprocess`]: decode uploads and build normalised input tensors
//! - [`inference`]: run a shared [`Predictor`] and rank its output
//!
//! All inference runs on CPU unless another device is requested.

pub mod artifact;
pub mod inference;
pub mod model_loader;
pub mod predictor;
pub mod preprocess;
pub mod resnet;

pub use artifact::{ensure_artifact, ArtifactFetcher, FetchOutcome};
pub use inference::InferenceAdapter;
pub use model_loader::{load_predictor, Architecture, ArtifactMetadata, DeviceType};
pub use predictor::Predictor;
pub use resnet::ResnetPredictor;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifact::{ensure_artifact, FetchOutcome};
    pub use crate::inference::InferenceAdapter;
    pub use crate::model_loader::{load_predictor, DeviceType};
    pub use crate::predictor::Predictor;
}
