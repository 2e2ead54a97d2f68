use anyhow::{Context, Result};
use std::path::PathBuf;

use trackledger::reader::BundleReader;

/// Display information about a bundle
pub fn run(bundle: PathBuf) -> Result<()> {
    if !bundle.exists() {
        anyhow::bail!("Bundle does not exist: {}", bundle.display());
    }

    let reader = BundleReader::open(&bundle)
        .with_context(|| format!("Failed to open bundle {}", bundle.display()))?;

    println!("trackledger Bundle Information");
    println!("==============================");
    println!("Bundle: {}", bundle.display());
    println!("Format version: {}", reader.format_version());
    println!("Created: {}", reader.created().to_rfc3339());
    println!();

    let attributes = reader.attributes();
    if !attributes.root.is_empty() {
        println!("Attributes:");
        for (name, value) in &attributes.root {
            println!("  {}: {}", name, value);
        }
        println!();
    }

    let infos = reader.table_infos().context("Failed to read table footers")?;
    if infos.is_empty() {
        println!("No tables (nothing was flushed)");
    }
    for info in infos {
        print!("{}", info);
        if let Some(table_attrs) = attributes.tables.get(&info.name) {
            for (name, value) in table_attrs {
                println!("  @{}: {}", name, value);
            }
        }
        println!();
    }

    Ok(())
}
