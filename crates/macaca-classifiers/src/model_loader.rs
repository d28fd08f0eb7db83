//! Model loading for Candle-based image classifiers
//!
//! Artifacts are SafeTensors files holding torchvision-style ResNet weights.
//! The header's `__metadata__` map describes the network and carries the
//! ordered class labels, so the artifact alone decides which index means
//! which class:
//!
//! | key            | required | meaning                                   |
//! |----------------|----------|-------------------------------------------|
//! | `labels`       | yes      | JSON array of class names, index order    |
//! | `architecture` | no       | `resnet18`..`resnet152`, default resnet34 |
//! | `image_size`   | no       | square input edge in pixels, default 224  |

use crate::resnet::ResnetPredictor;
use candle_core::{DType, Device};
use candle_nn::{Func, VarBuilder};
use macaca_core::{Error, Result, TOP_K};
use safetensors::SafeTensors;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Metadata key holding the JSON label array
pub const LABELS_KEY: &str = "labels";

/// Metadata key holding the network architecture
pub const ARCHITECTURE_KEY: &str = "architecture";

/// Metadata key holding the square input size
pub const IMAGE_SIZE_KEY: &str = "image_size";

const DEFAULT_IMAGE_SIZE: u32 = 224;

/// Device type for inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceType {
    /// CPU inference (always available)
    #[default]
    Cpu,
    /// CUDA GPU inference (if available)
    Cuda(usize), // GPU index
    /// Metal (Apple Silicon)
    Metal(usize),
}

impl DeviceType {
    /// Create the Candle device
    pub fn create(self) -> Result<Device> {
        match self {
            Self::Cpu => Ok(Device::Cpu),
            Self::Cuda(idx) => Device::new_cuda(idx)
                .map_err(|e| Error::model(format!("Failed to create CUDA device: {}", e))),
            Self::Metal(idx) => Device::new_metal(idx)
                .map_err(|e| Error::model(format!("Failed to create Metal device: {}", e))),
        }
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (kind, index) = match s.split_once(':') {
            Some((kind, idx)) => {
                let idx = idx
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid device index in '{}'", s))?;
                (kind, idx)
            }
            None => (s, 0),
        };

        match kind.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda(index)),
            "metal" | "mps" => Ok(Self::Metal(index)),
            _ => Err(format!("Unknown device '{}'. Valid options: cpu, cuda[:N], metal[:N]", s)),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda(idx) => write!(f, "cuda:{}", idx),
            Self::Metal(idx) => write!(f, "metal:{}", idx),
        }
    }
}

impl TryFrom<String> for DeviceType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceType> for String {
    fn from(value: DeviceType) -> Self {
        value.to_string()
    }
}

/// Supported network architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Architecture {
    Resnet18,
    #[default]
    Resnet34,
    Resnet50,
    Resnet101,
    Resnet152,
}

impl Architecture {
    /// Build the network with a `num_classes`-way final layer
    pub fn build(self, num_classes: usize, vb: VarBuilder<'static>) -> candle_core::Result<Func<'static>> {
        use candle_transformers::models::resnet;

        match self {
            Self::Resnet18 => resnet::resnet18(num_classes, vb),
            Self::Resnet34 => resnet::resnet34(num_classes, vb),
            Self::Resnet50 => resnet::resnet50(num_classes, vb),
            Self::Resnet101 => resnet::resnet101(num_classes, vb),
            Self::Resnet152 => resnet::resnet152(num_classes, vb),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resnet18 => "resnet18",
            Self::Resnet34 => "resnet34",
            Self::Resnet50 => "resnet50",
            Self::Resnet101 => "resnet101",
            Self::Resnet152 => "resnet152",
        }
    }
}

impl FromStr for Architecture {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "resnet18" => Ok(Self::Resnet18),
            "resnet34" => Ok(Self::Resnet34),
            "resnet50" => Ok(Self::Resnet50),
            "resnet101" => Ok(Self::Resnet101),
            "resnet152" => Ok(Self::Resnet152),
            other => Err(Error::model(format!("Unsupported architecture: {}", other))),
        }
    }
}

/// Network description read from the artifact header
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactMetadata {
    pub architecture: Architecture,
    pub labels: Vec<String>,
    pub image_size: u32,
}

impl ArtifactMetadata {
    /// Parse the `__metadata__` map of a SafeTensors header
    pub fn from_header(metadata: Option<&HashMap<String, String>>) -> Result<Self> {
        let metadata = metadata.ok_or_else(|| {
            Error::model("Artifact has no header metadata; a `labels` entry is required")
        })?;

        let labels_json = metadata
            .get(LABELS_KEY)
            .ok_or_else(|| Error::model("Artifact metadata has no `labels` entry"))?;
        let labels: Vec<String> = serde_json::from_str(labels_json)
            .map_err(|e| Error::model(format!("Invalid `labels` metadata: {}", e)))?;

        if labels.len() < TOP_K {
            return Err(Error::model(format!(
                "Artifact declares {} labels, at least {} are required",
                labels.len(),
                TOP_K
            )));
        }

        let architecture = match metadata.get(ARCHITECTURE_KEY) {
            Some(name) => name.parse()?,
            None => Architecture::default(),
        };

        let image_size = match metadata.get(IMAGE_SIZE_KEY) {
            Some(size) => size
                .parse::<u32>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| Error::model(format!("Invalid `image_size` metadata: {}", size)))?,
            None => DEFAULT_IMAGE_SIZE,
        };

        Ok(Self {
            architecture,
            labels,
            image_size,
        })
    }

    /// Read the metadata from raw SafeTensors bytes
    pub fn from_safetensors(bytes: &[u8]) -> Result<Self> {
        let (_, header) = SafeTensors::read_metadata(bytes)
            .map_err(|e| Error::model(format!("Failed to read SafeTensors header: {}", e)))?;
        Self::from_header(header.metadata().as_ref())
    }
}

/// Reject artifacts serialized in a form this runtime cannot execute.
///
/// Pickled learners (`learn.export()`) and `torch.save` zip archives need
/// Python to deserialize, so they are reported with instructions rather
/// than a raw parse error.
pub fn check_serialization_format(bytes: &[u8], path: &Path) -> Result<()> {
    const PICKLE_PROTO: u8 = 0x80;
    const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

    let format = match bytes {
        [PICKLE_PROTO, ..] => "a pickled Python object",
        b if b.starts_with(ZIP_MAGIC) => "a PyTorch zip archive",
        _ => return Ok(()),
    };

    Err(Error::IncompatibleArtifact(format!(
        "\n\nThe model artifact at {} was exported as {} and cannot be executed by this runtime.\n\n\
         Export the trained weights as a SafeTensors file whose metadata carries a `labels` entry \
         (a JSON array of class names in output order), plus optional `architecture` and \
         `image_size` entries.\n\n\
         Then update `model_url` to point at the new file and delete the cached copy so it is fetched again.",
        path.display(),
        format
    )))
}

/// Load a predictor from `dir/filename`
pub fn load_predictor(dir: &Path, filename: &str, device: DeviceType) -> Result<ResnetPredictor> {
    let path = dir.join(filename);
    if !path.exists() {
        return Err(Error::model(format!("Model file not found: {}", path.display())));
    }

    let bytes = std::fs::read(&path)?;
    check_serialization_format(&bytes, &path)?;

    let metadata = ArtifactMetadata::from_safetensors(&bytes)?;
    let device = device.create()?;

    info!(
        "Loading {} with {} classes from {}",
        metadata.architecture.as_str(),
        metadata.labels.len(),
        path.display()
    );

    let vb = VarBuilder::from_buffered_safetensors(bytes, DType::F32, &device)
        .map_err(|e| Error::model(format!("Failed to load SafeTensors: {}", e)))?;

    let model = metadata
        .architecture
        .build(metadata.labels.len(), vb)
        .map_err(|e| Error::model(format!("Failed to build {}: {}", metadata.architecture.as_str(), e)))?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(ResnetPredictor::new(name, model, device, metadata))
}
