pub mod cli;
pub mod config;
pub mod server;
pub mod startup;
pub mod state;
pub mod telemetry;

pub use cli::*;
pub use config::*;
pub use server::*;
pub use startup::*;
pub use state::*;
