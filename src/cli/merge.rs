use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use trackledger::merge::merge_runs;
use trackledger::storage::{BundleConfig, CompressionType};

/// Merge run bundles
pub fn run(output: PathBuf, inputs: Vec<PathBuf>, compression_level: i32) -> Result<()> {
    for input in &inputs {
        if !input.exists() {
            anyhow::bail!("Input bundle does not exist: {}", input.display());
        }
    }

    let config = BundleConfig {
        compression: CompressionType::Zstd(compression_level),
        ..Default::default()
    };

    info!("Merging {} bundles into {}", inputs.len(), output.display());
    let stats = merge_runs(&inputs, &output, config)
        .with_context(|| format!("Failed to merge into {}", output.display()))?;

    println!("{}", stats);
    Ok(())
}
