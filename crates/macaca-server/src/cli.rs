use clap::{Parser, Subcommand};
use macaca_classifiers::DeviceType;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "macaca")]
#[command(author, version, about = "Macaque species image classifier")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "macaca.yaml", global = true)]
    pub config: PathBuf,

    /// Remote URL of the model artifact
    #[arg(long, env = "MACACA_MODEL_URL", global = true)]
    pub model_url: Option<String>,

    /// Directory the artifact is cached in
    #[arg(long, env = "MACACA_MODEL_DIR", global = true)]
    pub model_dir: Option<PathBuf>,

    /// Cached artifact filename
    #[arg(long, env = "MACACA_MODEL_FILE", global = true)]
    pub model_file: Option<String>,

    /// Inference device: cpu, cuda[:N] or metal[:N]
    #[arg(long, env = "MACACA_DEVICE", value_parser = parse_device, global = true)]
    pub device: Option<DeviceType>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Without a command the model is fetched and loaded, then the process exits
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the model and start the web server
    Serve {
        /// Listen address
        #[arg(short, long)]
        listen: Option<String>,

        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Download the model artifact if it is not cached yet
    Fetch,

    /// Classify a local image and print the top-3 predictions as JSON
    Predict {
        /// Image file to classify
        image: PathBuf,
    },
}

fn parse_device(s: &str) -> Result<DeviceType, String> {
    s.parse()
}
