use anyhow::{Context, Result};
use std::fs;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

use parity_call_tracer::models::common::{OutputFormat, Precompiles};
use parity_call_tracer::replay::{replay, RecordedExecution};
use parity_call_tracer::tracer::geth::to_geth_frame;
use parity_call_tracer::utils::load_config;

fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the trace
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yml".to_string());
    let config = match load_config(&config_path) {
        Ok(config) => {
            info!("Config loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Err(e);
        }
    };

    info!("Replaying recorded execution: {}", config.input);
    let contents = fs::read_to_string(&config.input)
        .with_context(|| format!("failed to read recorded execution {}", config.input))?;
    let execution: RecordedExecution =
        serde_json::from_str(&contents).context("failed to parse recorded execution")?;

    let tracer = replay(&execution, Precompiles::from(&config))?;

    match config.output_format {
        OutputFormat::Parity => {
            let documents = tracer.finalize()?;
            info!("Produced {} trace documents", documents.len());
            for document in documents {
                println!("{}", document.get());
            }
        }
        OutputFormat::Geth => {
            let trace = tracer.finished()?;
            println!("{}", serde_json::to_string(&to_geth_frame(&trace.root))?);
        }
    }

    Ok(())
}
