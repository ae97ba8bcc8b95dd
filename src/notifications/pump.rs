//! Background Event Pump
//!
//! Drives an [`EventSource`] on a tokio task and forwards each event into the
//! store. The pump is the only autonomous writer; it goes through the same
//! `add_notification` path as every other producer, so its insertions are
//! serialised with externally triggered mutations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::notifications::error::{NotificationError, NotificationResult};
use crate::notifications::store::NotificationStore;
use crate::notifications::traits::EventSource;

/// How long `stop` waits for the task to finish
pub const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to a running pump task
pub struct EventPump {
    name: String,
    cancellation_token: CancellationToken,
    injected: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl EventPump {
    /// Spawn a task forwarding events from `source` into `store`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S>(store: NotificationStore, mut source: S) -> Self
    where
        S: EventSource + 'static,
    {
        let name = source.source_name().to_string();
        let cancellation_token = CancellationToken::new();
        let injected = Arc::new(AtomicU64::new(0));

        let token = cancellation_token.clone();
        let counter = Arc::clone(&injected);
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            debug!("Event pump '{}' started", task_name);
            loop {
                let event = tokio::select! {
                    _ = token.cancelled() => break,
                    event = source.next_event() => event,
                };

                let Some(event) = event else {
                    info!("Event source '{}' exhausted", task_name);
                    break;
                };

                match store.add_notification(event) {
                    Ok(id) => {
                        counter.fetch_add(1, Ordering::Relaxed);
                        debug!("Event pump '{}' injected {}", task_name, id);
                    }
                    Err(e) => warn!("Event pump '{}' skipped invalid event: {}", task_name, e),
                }
            }
            debug!("Event pump '{}' stopped", task_name);
        });

        Self {
            name,
            cancellation_token,
            injected,
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Notifications injected so far
    pub fn injected(&self) -> u64 {
        self.injected.load(Ordering::Relaxed)
    }

    /// True once the task has exited (cancelled or source exhausted)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the task and wait for it; returns the number of injected notifications
    pub async fn stop(self) -> NotificationResult<u64> {
        self.cancellation_token.cancel();

        match tokio::time::timeout(STOP_TIMEOUT, self.handle).await {
            Ok(Ok(())) => {}
            Ok(Err(join_err)) => {
                return Err(NotificationError::generic(format!(
                    "event pump '{}' task failed: {}",
                    self.name, join_err
                )));
            }
            Err(_) => {
                return Err(NotificationError::timeout(
                    format!("stop event pump '{}'", self.name),
                    STOP_TIMEOUT.as_millis() as u64,
                ));
            }
        }

        let injected = self.injected.load(Ordering::Relaxed);
        info!("Event pump '{}' stopped after injecting {} notification(s)", self.name, injected);
        Ok(injected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::config::GeneratorConfig;
    use crate::notifications::generator::{ChannelEventSource, SyntheticEventSource};
    use crate::notifications::record::{Category, NewNotification, NotificationType, Priority};

    #[tokio::test(start_paused = true)]
    async fn test_synthetic_pump_injects_on_schedule() {
        let store = NotificationStore::default();
        let config = GeneratorConfig::default()
            .with_interval(Duration::from_secs(30))
            .with_probability(1.0);
        let source = SyntheticEventSource::seeded(&config, 11).unwrap();

        let pump = EventPump::spawn(store.clone(), source);
        tokio::time::sleep(Duration::from_secs(95)).await;

        let injected = pump.stop().await.unwrap();
        assert_eq!(injected, 3);
        assert_eq!(store.len(), 3);
        assert_eq!(store.unread_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pump_with_zero_probability_injects_nothing() {
        let store = NotificationStore::default();
        let config = GeneratorConfig::default().with_probability(0.0);
        let pump = EventPump::spawn(store.clone(), SyntheticEventSource::seeded(&config, 5).unwrap());

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(pump.stop().await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_channel_pump_skips_invalid_events_and_finishes() {
        let store = NotificationStore::default();
        let (sender, source) = ChannelEventSource::channel("upstream", 8);
        let pump = EventPump::spawn(store.clone(), source);

        sender
            .send(NewNotification::new("Restock", "Gloves restocked", NotificationType::Success, Category::Inventory, Priority::Low))
            .await
            .unwrap();
        sender
            .send(NewNotification::new("", "no title", NotificationType::Info, Category::System, Priority::Low))
            .await
            .unwrap();
        drop(sender);

        for _ in 0..100 {
            if pump.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(pump.is_finished());
        assert_eq!(pump.name(), "upstream");
        assert_eq!(pump.stop().await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.notifications()[0].title, "Restock");
    }
}
