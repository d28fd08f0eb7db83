//! Model artifact fetching
//!
//! The artifact is downloaded at most once: if the destination file already
//! exists it is used as-is, without any integrity check.

use macaca_core::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Result of ensuring an artifact is present on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file was already on disk; no request was made
    AlreadyPresent,

    /// The file was downloaded and written
    Downloaded {
        /// Number of bytes written
        bytes: u64,
    },
}

/// Downloads model artifacts over HTTP
#[derive(Debug, Clone, Default)]
pub struct ArtifactFetcher {
    client: reqwest::Client,
}

impl ArtifactFetcher {
    /// Create a fetcher with a default HTTP client
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `dest` exists, downloading it from `url` if it does not.
    ///
    /// Any network failure or non-success status is returned as
    /// [`Error::Artifact`]. No retry is attempted and the destination is only
    /// written once the whole body has been received.
    pub async fn ensure(&self, url: &str, dest: &Path) -> Result<FetchOutcome> {
        if tokio::fs::try_exists(dest).await? {
            debug!("Artifact already present at {}", dest.display());
            return Ok(FetchOutcome::AlreadyPresent);
        }

        info!("Downloading model artifact from {} to {}", url, dest.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::artifact(format!("Failed to request {}: {}", url, e)))?
            .error_for_status()
            .map_err(|e| Error::artifact(format!("Failed to download {}: {}", url, e)))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::artifact(format!("Failed to read body from {}: {}", url, e)))?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &body).await?;

        info!("Model artifact written ({} bytes)", body.len());
        Ok(FetchOutcome::Downloaded {
            bytes: body.len() as u64,
        })
    }
}

/// Ensure `dest` exists, downloading it from `url` with a default client
pub async fn ensure_artifact(url: &str, dest: &Path) -> Result<FetchOutcome> {
    ArtifactFetcher::new().ensure(url, dest).await
}
