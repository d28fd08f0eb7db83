//! Server configuration

use crate::cli::Cli;
use macaca_classifiers::DeviceType;
use macaca_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Where the reference deployment publishes its model artifact
pub const DEFAULT_MODEL_URL: &str =
    "https://drive.google.com/uc?export=download&id=12Sog5-ZO_UoKLsu0MvJyxuxt8hF4aXbN";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Remote location of the model artifact
    #[serde(default = "default_model_url")]
    pub model_url: String,

    /// Directory holding the cached artifact
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Cached artifact filename inside `model_dir`
    #[serde(default = "default_model_file")]
    pub model_file: String,

    /// Inference device
    #[serde(default)]
    pub device: DeviceType,

    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Maximum accepted request body for uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &Path, cli: &Cli) -> Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content).map_err(|e| {
                Error::config(format!("Failed to parse {}: {}", config_path.display(), e))
            })?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(url) = &cli.model_url {
            config.model_url = url.clone();
        }

        if let Some(dir) = &cli.model_dir {
            config.model_dir = dir.clone();
        }

        if let Some(file) = &cli.model_file {
            config.model_file = file.clone();
        }

        if let Some(device) = cli.device {
            config.device = device;
        }

        Ok(config)
    }

    /// Full path of the cached artifact
    pub fn artifact_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }

    /// Address the listener binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.listen, self.port)
            .parse()
            .map_err(|e| Error::config(format!("Invalid listen address: {}", e)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_url: default_model_url(),
            model_dir: default_model_dir(),
            model_file: default_model_file(),
            device: DeviceType::default(),
            listen: default_listen(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_model_url() -> String {
    DEFAULT_MODEL_URL.to_string()
}

fn default_model_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_model_file() -> String {
    "export.safetensors".to_string()
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5042
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
