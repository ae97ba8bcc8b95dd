use clap::{Parser, Subcommand, ValueEnum};
use anyhow::Result;
use std::path::PathBuf;
use log::{debug, info};

use crate::config::parse_interval;
use crate::notifications::{Category, ReadFilter};

/// Live notification feed for hospital supply-chain dashboards
#[derive(Parser, Debug)]
#[command(name = "supplyfeed")]
#[command(about = "Inventory, marketplace and prediction notifications with live subscriber updates")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbose output (debug level logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    pub log_format: String,

    /// Log file path for file output
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Configuration section name
    #[arg(long, value_name = "SECTION", global = true)]
    pub config_name: Option<String>,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Feed output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the feed (seeded with sample notifications unless disabled)
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Which records to show: all, unread or high
        #[arg(long, value_name = "FILTER", default_value = "all")]
        filter: ReadFilter,

        /// Only show one category: inventory, marketplace, ml, ai or system
        #[arg(long, value_name = "CATEGORY")]
        category: Option<Category>,

        /// Start from an empty feed
        #[arg(long)]
        no_seed: bool,
    },

    /// Run each simulated producer once and print the resulting feed
    Demo {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Run the synthetic event generator and print every feed update
    Watch {
        /// Stop after this long (e.g. 90s, 5m); runs until Ctrl-C otherwise
        #[arg(long, value_name = "DURATION", value_parser = parse_interval)]
        duration: Option<std::time::Duration>,

        /// Generator tick interval (overrides configuration)
        #[arg(long, value_name = "INTERVAL", value_parser = parse_interval)]
        interval: Option<std::time::Duration>,

        /// Per-tick event probability between 0 and 1 (overrides configuration)
        #[arg(long, value_name = "P")]
        probability: Option<f64>,

        /// Seed for the generator's random source, for reproducible runs
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Start from an empty feed
        #[arg(long)]
        no_seed: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::List {
            format: OutputFormat::Table,
            filter: ReadFilter::All,
            category: None,
            no_seed: false,
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    debug!("Parsing command line arguments");
    let args = Args::parse();
    debug!("Parsed CLI arguments: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    debug!("Validating CLI argument combinations");

    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    match args.log_format.to_lowercase().as_str() {
        "text" | "json" => {},
        _ => return Err(anyhow::anyhow!(
            "Invalid log format '{}'. Valid options: text, json", args.log_format
        )),
    }

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {},
            _ => return Err(anyhow::anyhow!(
                "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace", level
            )),
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!(
            "--log-file-level requires --log-file to be specified"
        ));
    }

    if let Some(Command::Watch { probability: Some(p), .. }) = &args.command {
        if !(0.0..=1.0).contains(p) {
            return Err(anyhow::anyhow!(
                "Invalid probability {}. Must be between 0 and 1", p
            ));
        }
    }

    if let Some(Command::Watch { interval: Some(interval), .. }) = &args.command {
        if interval.is_zero() {
            return Err(anyhow::anyhow!("--interval must be greater than zero"));
        }
    }

    info!("CLI arguments validated successfully");
    Ok(())
}
