use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod demo;
mod info;
mod merge;

pub use demo::DemoArgs;

/// trackledger - event and boundary-crossing ledgers for transport runs
#[derive(Parser)]
#[command(name = "trackledger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate events with the synthetic kernel and record them
    Demo(DemoArgs),

    /// Display tables, field layouts and attributes of a bundle
    Info {
        /// Bundle directory
        #[arg(value_name = "BUNDLE")]
        bundle: PathBuf,
    },

    /// Merge run bundles into one bundle with a `runs` table
    Merge {
        /// Output bundle directory
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Input bundles, in merge order
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Compression level for ZSTD (1-22, default: 3)
        #[arg(short = 'c', long, default_value = "3")]
        compression_level: i32,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Demo(args) => demo::run(args),
        Commands::Info { bundle } => info::run(bundle),
        Commands::Merge {
            output,
            inputs,
            compression_level,
        } => merge::run(output, inputs, compression_level),
    }
}
