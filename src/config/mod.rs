#[cfg(feature = "cli")]
pub mod cli;
pub mod environment;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use environment::Environment;
pub use toml_config::ClientConfig;
