//! Error types for Macaca

/// Result type alias using Macaca's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Macaca operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Artifact download errors
    #[error("artifact error: {0}")]
    Artifact(String),

    /// The artifact was serialized in a form this runtime cannot execute.
    /// The message carries remediation instructions and is shown verbatim.
    #[error("{0}")]
    IncompatibleArtifact(String),

    /// Model deserialization and construction errors
    #[error("model error: {0}")]
    Model(String),

    /// Uploaded bytes could not be decoded as an image
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// Forward pass or post-processing errors
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new image decode error
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ImageDecode(_))
    }
}
