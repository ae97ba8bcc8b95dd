//! Application initialization and configuration

use anyhow::{Context, Result};
use log::{debug, error, info};
use crate::{cli, config, display, logging};
use crate::notifications::{FeedConfig, NotificationStore};

pub fn load_configuration(args: &cli::Args) -> Result<config::ConfigManager> {
    let mut manager = if let Some(config_file) = &args.config_file {
        debug!("Loading configuration from explicit file: {}", config_file.display());
        config::ConfigManager::load_from_file(config_file.clone())?
    } else {
        config::ConfigManager::load()?
    };

    if let Some(section_name) = &args.config_name {
        debug!("Selecting configuration section: {}", section_name);
        manager.select_section(section_name.clone());
    }

    Ok(manager)
}

pub fn configure_logging(args: &cli::Args, config: &config::ConfigManager) -> Result<logging::LogConfig> {
    use log::LevelFilter;
    use std::str::FromStr;

    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        match config.get_log_level("base", "console-level") {
            Ok(Some(level)) => {
                debug!("Using console log level from config: {:?}", level);
                level
            }
            Ok(None) => LevelFilter::Warn,
            Err(e) => {
                debug!("Invalid console-level in config, using default: {}", e);
                LevelFilter::Warn
            }
        }
    };

    debug!("Console log level set to: {:?}", console_level);

    let format = if !args.log_format.is_empty() && args.log_format != "text" {
        logging::LogFormat::from_str(&args.log_format)
            .map_err(|e| anyhow::anyhow!(e))?
    } else {
        match config.get_value("base", "log-format") {
            Some(format_str) => {
                debug!("Using log format from config: {}", format_str);
                logging::LogFormat::from_str(format_str)
                    .unwrap_or(logging::LogFormat::Text)
            }
            None => logging::LogFormat::Text,
        }
    };

    debug!("Log format set to: {:?}", format);

    let log_file_path = args.log_file.clone()
        .or_else(|| config.get_path("base", "log-file"));

    let file_log_level = match &args.log_file_level {
        Some(level_str) => Some(logging::parse_log_level(level_str)?),
        None => {
            match config.get_log_level("base", "file-log-level") {
                Ok(Some(level)) => {
                    debug!("Using file log level from config: {:?}", level);
                    Some(level)
                }
                Ok(None) => None,
                Err(e) => {
                    debug!("Invalid file-log-level in config, using None: {}", e);
                    None
                }
            }
        }
    };

    let (destination, file_level) = match (log_file_path.as_ref(), file_log_level) {
        (Some(file_path), Some(level)) => {
            debug!("File logging enabled: {} (level: {:?})", file_path.display(), level);
            (logging::LogDestination::Both(file_path.clone()), Some(level))
        }
        (Some(file_path), None) => {
            debug!("File logging enabled: {} (level: {:?} - same as console)", file_path.display(), console_level);
            (logging::LogDestination::Both(file_path.clone()), Some(console_level))
        }
        (None, None) => {
            debug!("Console-only logging enabled");
            (logging::LogDestination::Console, None)
        }
        (None, Some(_)) => {
            error!("Log file level specified without log file - this should have been caught during validation");
            return Err(anyhow::anyhow!("Log file level specified without log file"));
        }
    };

    Ok(logging::LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}

/// Create a ColourManager from CLI arguments and the `[display] color` key
pub fn create_colour_manager(args: &cli::Args, config: &config::ConfigManager) -> Result<display::ColourManager> {
    let config_enabled = config.get_bool("display", "color")?;
    let manager = display::ColourManager::from_args_and_config(args.no_color, config_enabled);
    if !manager.colours_enabled() {
        colored::control::set_override(false);
    }
    Ok(manager)
}

/// Feed configuration from the config file with command-line overrides applied
pub fn resolve_feed_config(command: &cli::Command, config: &config::ConfigManager) -> Result<FeedConfig> {
    let mut feed_config = config.get_feed_config()?;

    match command {
        cli::Command::List { no_seed, .. } => {
            if *no_seed {
                feed_config.seed_sample_data = false;
            }
        }
        cli::Command::Demo { .. } => {
            feed_config.seed_sample_data = false;
        }
        cli::Command::Watch { interval, probability, no_seed, .. } => {
            if let Some(interval) = interval {
                feed_config.generator.interval = *interval;
            }
            if let Some(probability) = probability {
                feed_config.generator.probability = *probability;
            }
            if *no_seed {
                feed_config.seed_sample_data = false;
            }
        }
    }

    feed_config.validate()
        .context("Invalid feed configuration")?;
    Ok(feed_config)
}

/// Build the store and seed it when configured to
pub fn create_store(feed_config: &FeedConfig) -> Result<NotificationStore> {
    let store = NotificationStore::new(feed_config)
        .context("Failed to create notification store")?;

    if feed_config.seed_sample_data {
        store.seed_sample_data();
    }

    info!("Notification store ready ({} records, retention {})", store.len(), store.retention_cap());
    Ok(store)
}
