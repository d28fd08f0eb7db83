//! Macaca Core
//!
//! Core types and utilities shared across Macaca components.
//!
//! This crate provides:
//! - Error types and result handling
//! - Ranked prediction types and their wire formatting

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{AnalyzeResponse, Prediction, TopPredictions, TOP_K};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{AnalyzeResponse, Prediction, TopPredictions, TOP_K};
}
