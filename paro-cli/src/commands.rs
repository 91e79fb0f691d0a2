use std::path::Path;

use anyhow::{Context, Result};
use paro::{observability::init_tracing, Config};

pub mod params;
pub mod parse;

/// Load configuration from `path`, or `./paro.toml`, and start logging
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    init_tracing(&config)?;
    Ok(config)
}
