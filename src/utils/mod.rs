pub mod hex;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::models::common::TracerConfig;

/// Loads the tracer config from a YAML file, with `TRACER_*` environment
/// variables taking precedence. Missing keys fall back to defaults.
pub fn load_config<P: AsRef<Path>>(file_name: P) -> Result<TracerConfig> {
    let config_path = file_name.as_ref();
    info!("Config path: {}", config_path.to_string_lossy());

    let settings = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("TRACER"))
        .build()
        .context("failed to read config file")?;

    let config: TracerConfig = settings
        .try_deserialize()
        .context("failed to parse tracer config")?;

    Ok(config)
}
