use anyhow::Result;
use std::process;
use log::error;

use supplyfeed::{app, cli, logging};

fn main() {
    if let Err(e) = run() {
        error!("Application error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args();

    cli::validate_args(&args)?;

    let config_manager = app::load_configuration(&args)?;

    let log_config = app::configure_logging(&args, &config_manager)?;
    logging::init_logger(log_config)?;

    let colours = app::create_colour_manager(&args, &config_manager)?;
    let command = args.command.clone().unwrap_or_default();
    let feed_config = app::resolve_feed_config(&command, &config_manager)?;
    let store = app::create_store(&feed_config)?;

    // Single-threaded runtime; the event pump is the only background task
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(app::run_command(command, store, &feed_config, &colours))
}
