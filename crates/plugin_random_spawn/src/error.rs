//! Error types for the random spawn plugin.

use spawn_engine::PolicyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid spawn policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("Host error: {0}")]
    Host(String),
}
