//! Command execution

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use chrono::Utc;
use futures::StreamExt;
use log::{debug, info, warn};

use crate::cli::{Command, OutputFormat};
use crate::display::{self, ColourManager};
use crate::notifications::{
    FeedConfig, FeedContext, FeedFilter, NotificationId, NotificationRecord, NotificationStore,
    SyntheticEventSource, WalletEvent, EventPump,
};

/// Run one subcommand against a prepared store
pub async fn run_command(
    command: Command,
    store: NotificationStore,
    feed_config: &FeedConfig,
    colours: &ColourManager,
) -> Result<()> {
    match command {
        Command::List { format, filter, category, .. } => {
            let mut feed_filter = FeedFilter::new(filter);
            if let Some(category) = category {
                feed_filter = feed_filter.in_category(category);
            }
            run_list(&store, feed_filter, format, colours)
        }
        Command::Demo { format } => run_demo(&store, format, colours),
        Command::Watch { duration, seed, .. } => {
            run_watch(store, feed_config, seed, duration, colours).await
        }
    }
}

pub fn run_list(
    store: &NotificationStore,
    filter: FeedFilter,
    format: OutputFormat,
    colours: &ColourManager,
) -> Result<()> {
    let records = store.notifications();
    let shown = filter.apply(&records);
    debug!("Listing {} of {} notification(s)", shown.len(), records.len());
    print_feed(&shown, store, format, colours)
}

/// Exercise each producer once, mark the prediction read, then print the feed
pub fn run_demo(store: &NotificationStore, format: OutputFormat, colours: &ColourManager) -> Result<()> {
    let updates = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&updates);
    let subscription = store.subscribe_fn("demo", move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(())
    });

    store.record_wallet_event(WalletEvent::Connected {
        address: "0x71C7656EC7ab88b098defB751B7401B5f6d8976F".to_string(),
    })?;
    store.simulate_inventory_alert("Paracetamol", 12)?;
    store.simulate_marketplace_order("ORD-2291", "Amoxicillin", 40)?;
    let prediction = store.simulate_ml_prediction(94.2)?;
    store.simulate_ai_recommendation("Insulin")?;
    store.mark_as_read(&prediction);

    subscription.unsubscribe();
    // The initial delivery on subscribe counts too
    info!("Demo produced {} feed update(s)", updates.load(Ordering::Relaxed));

    let records = store.notifications();
    let shown: Vec<&NotificationRecord> = records.iter().collect();
    print_feed(&shown, store, format, colours)
}

/// Print every arrival until `duration` elapses or Ctrl-C
pub async fn run_watch(
    store: NotificationStore,
    feed_config: &FeedConfig,
    seed: Option<u64>,
    duration: Option<Duration>,
    colours: &ColourManager,
) -> Result<()> {
    let context = FeedContext::new(&store, "watch");
    let mut changes = context.changes();

    let pump = if feed_config.generator.enabled {
        let source = match seed {
            Some(seed) => SyntheticEventSource::seeded(&feed_config.generator, seed)?,
            None => SyntheticEventSource::new(&feed_config.generator)?,
        };
        info!(
            "Starting event generator (interval {:?}, probability {})",
            feed_config.generator.interval, feed_config.generator.probability
        );
        Some(EventPump::spawn(store.clone(), source))
    } else {
        warn!("Event generator disabled in configuration; watching for external changes only");
        None
    };

    let initial = context.view();
    let shown: Vec<&NotificationRecord> = initial.notifications.iter().collect();
    print!("{}", display::format_feed_table(&shown, colours, Utc::now()));
    println!("{}", colours.highlight("Watching for new notifications (Ctrl-C to stop)"));
    let mut newest = initial.notifications.first().map(|r| r.id);

    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut deadline => {
                debug!("Watch duration elapsed");
                break;
            }
            result = &mut ctrl_c => {
                result.context("Failed to listen for Ctrl-C")?;
                debug!("Interrupted");
                break;
            }
            view = changes.next() => {
                let Some(view) = view else { break };
                for record in arrivals_since(&view.notifications, newest) {
                    println!("{}", display::format_arrival(record, colours));
                }
                newest = view.notifications.first().map(|r| r.id).or(newest);
            }
        }
    }

    if let Some(pump) = pump {
        let injected = pump.stop().await?;
        println!("Generated {} notification(s)", injected);
    }
    println!("{}", display::format_summary(&store.summary(), colours));
    Ok(())
}

/// Records newer than `newest`, oldest first
fn arrivals_since(feed: &[NotificationRecord], newest: Option<NotificationId>) -> Vec<&NotificationRecord> {
    feed.iter()
        .take_while(|record| newest.map_or(true, |seen| record.id > seen))
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

fn print_feed(
    records: &[&NotificationRecord],
    store: &NotificationStore,
    format: OutputFormat,
    colours: &ColourManager,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", display::format_feed_json(records)?),
        OutputFormat::Table => {
            print!("{}", display::format_feed_table(records, colours, Utc::now()));
            println!();
            println!("{}", display::format_summary(&store.summary(), colours));
        }
    }
    Ok(())
}
