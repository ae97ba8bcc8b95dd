//! Event Sources
//!
//! [`SyntheticEventSource`] stands in for real upstream triggers: on every
//! interval tick it injects, with a fixed probability, one notification drawn
//! from a small set of typical cross-subsystem events. [`ChannelEventSource`]
//! lets a real producer (an inventory poller, a marketplace listener) feed the
//! store through the same pump.

use std::time::Duration;
use async_trait::async_trait;
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::notifications::config::GeneratorConfig;
use crate::notifications::error::{NotificationError, NotificationResult};
use crate::notifications::record::{Category, NewNotification, NotificationType, Priority};
use crate::notifications::traits::EventSource;

/// Template of a synthetic notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTemplate {
    pub title: &'static str,
    pub message: &'static str,
    pub kind: NotificationType,
    pub category: Category,
    pub priority: Priority,
}

impl EventTemplate {
    pub fn to_notification(&self) -> NewNotification {
        NewNotification::new(self.title, self.message, self.kind, self.category, self.priority)
    }
}

/// Candidate events of the synthetic generator
pub const SYNTHETIC_EVENTS: [EventTemplate; 5] = [
    EventTemplate {
        title: "Inventory Update",
        message: "Stock levels have been updated for multiple items",
        kind: NotificationType::Info,
        category: Category::Inventory,
        priority: Priority::Medium,
    },
    EventTemplate {
        title: "Marketplace Activity",
        message: "New supplier has joined the marketplace",
        kind: NotificationType::Success,
        category: Category::Marketplace,
        priority: Priority::Low,
    },
    EventTemplate {
        title: "ML Model Training",
        message: "New prediction model training has started",
        kind: NotificationType::Info,
        category: Category::Ml,
        priority: Priority::Medium,
    },
    EventTemplate {
        title: "Critical Stock Alert",
        message: "Emergency medicine stock is critically low",
        kind: NotificationType::Error,
        category: Category::Inventory,
        priority: Priority::High,
    },
    EventTemplate {
        title: "AI Analysis Complete",
        message: "Medicine interaction analysis completed",
        kind: NotificationType::Success,
        category: Category::Ai,
        priority: Priority::Low,
    },
];

/// Timer-driven random event generator
pub struct SyntheticEventSource {
    ticker: Interval,
    probability: f64,
    rng: StdRng,
    ticks: u64,
}

impl SyntheticEventSource {
    /// Create a generator seeded from the operating system
    pub fn new(config: &GeneratorConfig) -> NotificationResult<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a generator with a fixed seed (reproducible sequences)
    pub fn seeded(config: &GeneratorConfig, seed: u64) -> NotificationResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GeneratorConfig, rng: StdRng) -> NotificationResult<Self> {
        config.validate()?;
        Ok(Self {
            ticker: first_tick_after(config.interval),
            probability: config.probability,
            rng,
            ticks: 0,
        })
    }

    /// Ticks elapsed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Decide the outcome of one tick
    fn roll(&mut self) -> Option<NewNotification> {
        if !self.rng.random_bool(self.probability) {
            return None;
        }
        let template = &SYNTHETIC_EVENTS[self.rng.random_range(0..SYNTHETIC_EVENTS.len())];
        Some(template.to_notification())
    }
}

/// Interval whose first tick fires one full period after creation
fn first_tick_after(period: Duration) -> Interval {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

#[async_trait]
impl EventSource for SyntheticEventSource {
    async fn next_event(&mut self) -> Option<NewNotification> {
        loop {
            self.ticker.tick().await;
            self.ticks += 1;
            match self.roll() {
                Some(event) => return Some(event),
                None => trace!("Synthetic generator tick {} produced no event", self.ticks),
            }
        }
    }

    fn source_name(&self) -> &str {
        "synthetic"
    }
}

/// Sending half handed to an upstream producer
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<NewNotification>,
}

impl EventSender {
    /// Queue an event for the store; fails once the pump is gone
    pub async fn send(&self, event: NewNotification) -> NotificationResult<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| NotificationError::generic("event channel closed"))
    }

    /// Non-blocking variant for synchronous producers
    pub fn try_send(&self, event: NewNotification) -> NotificationResult<()> {
        self.tx
            .try_send(event)
            .map_err(|e| NotificationError::generic(format!("event channel unavailable: {}", e)))
    }
}

/// Event source backed by an mpsc channel
pub struct ChannelEventSource {
    name: String,
    rx: mpsc::Receiver<NewNotification>,
}

impl ChannelEventSource {
    /// Create a bounded channel; the source ends once every sender is dropped
    pub fn channel(name: impl Into<String>, capacity: usize) -> (EventSender, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (EventSender { tx }, Self { name: name.into(), rx })
    }
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn next_event(&mut self) -> Option<NewNotification> {
        self.rx.recv().await
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_cover_expected_events() {
        let titles: Vec<_> = SYNTHETIC_EVENTS.iter().map(|t| t.title).collect();
        assert_eq!(
            titles,
            vec![
                "Inventory Update",
                "Marketplace Activity",
                "ML Model Training",
                "Critical Stock Alert",
                "AI Analysis Complete",
            ]
        );
        for template in SYNTHETIC_EVENTS.iter() {
            assert!(template.to_notification().validate().is_ok());
        }
    }

    #[tokio::test]
    async fn test_probability_extremes() {
        let always = GeneratorConfig::default().with_probability(1.0);
        let mut source = SyntheticEventSource::seeded(&always, 7).unwrap();
        for _ in 0..20 {
            let event = source.roll().expect("probability 1.0 always injects");
            assert!(SYNTHETIC_EVENTS.iter().any(|t| t.title == event.title));
        }

        let never = GeneratorConfig::default().with_probability(0.0);
        let mut source = SyntheticEventSource::seeded(&never, 7).unwrap();
        assert!((0..100).all(|_| source.roll().is_none()));
    }

    #[tokio::test]
    async fn test_seeded_sources_are_reproducible() {
        let config = GeneratorConfig::default();
        let mut a = SyntheticEventSource::seeded(&config, 42).unwrap();
        let mut b = SyntheticEventSource::seeded(&config, 42).unwrap();
        let rolls_a: Vec<_> = (0..50).map(|_| a.roll()).collect();
        let rolls_b: Vec<_> = (0..50).map(|_| b.roll()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[tokio::test]
    async fn test_rejects_invalid_config() {
        let bad = GeneratorConfig::default().with_probability(2.0);
        assert!(SyntheticEventSource::seeded(&bad, 1).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_interval() {
        let config = GeneratorConfig::default()
            .with_interval(Duration::from_secs(30))
            .with_probability(1.0);
        let mut source = SyntheticEventSource::seeded(&config, 3).unwrap();

        let started = Instant::now();
        let event = source.next_event().await;
        assert!(event.is_some());
        assert_eq!(source.ticks(), 1);
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_channel_source_ends_when_senders_drop() {
        let (sender, mut source) = ChannelEventSource::channel("upstream", 2);
        let event = NewNotification::new("t", "m", NotificationType::Info, Category::System, Priority::Low);
        let queued = NewNotification::new("q", "n", NotificationType::Warning, Category::Inventory, Priority::High);
        sender.send(event.clone()).await.unwrap();
        sender.try_send(queued.clone()).unwrap();
        // capacity reached
        assert!(sender.try_send(queued.clone()).is_err());
        drop(sender);

        assert_eq!(source.source_name(), "upstream");
        assert_eq!(source.next_event().await, Some(event));
        assert_eq!(source.next_event().await, Some(queued));
        assert_eq!(source.next_event().await, None);
    }
}
