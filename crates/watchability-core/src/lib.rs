// Shared configuration for the watchability workspace.

pub mod config;

pub use config::{load_config, Config, ConfigError};
