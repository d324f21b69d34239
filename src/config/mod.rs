//! Configuration parsing and types.

pub mod env;
pub mod parser;
pub mod types;
pub mod validate;

pub use types::*;

use crate::common::error::ConfigError;

/// Load a config file, apply environment overrides, and validate.
pub fn load_and_validate(path: &str) -> Result<Config, ConfigError> {
    let config = parser::load_config(path)?;
    let config = env::apply_env_overrides(config);
    validate::validate_config(&config)?;
    Ok(config)
}
