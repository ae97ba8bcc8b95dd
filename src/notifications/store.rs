//! Notification Store
//!
//! The single owner of the notification feed. All mutations funnel through the
//! operations below; each one applies atomically and is then broadcast to the
//! subscribers as one immutable snapshot (see [`crate::notifications::registry`]).
//!
//! The store is an explicitly constructed, cheaply cloneable handle. An
//! application creates one at start-up and passes clones to its producers and
//! consumers.

use std::collections::VecDeque;
use std::sync::Arc;
use chrono::{Duration as ChronoDuration, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use serde::Serialize;

use crate::notifications::config::{FeedConfig, DEFAULT_RETENTION_CAP};
use crate::notifications::error::{NotificationError, NotificationResult};
use crate::notifications::record::{
    Category, NewNotification, NotificationId, NotificationRecord, NotificationType, Priority,
};
use crate::notifications::registry::{
    DeliveryStats, FeedSnapshot, ListenerRegistry, Subscription, SubscriptionId,
};
use crate::notifications::traits::{FeedSubscriber, FnSubscriber};

/// Counts derived from the current feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    pub total: usize,
    pub unread: usize,
    pub high_priority: usize,
}

impl FeedSummary {
    /// Linear scan; at retention-cap sizes there is nothing to cache
    pub fn of(records: &[NotificationRecord]) -> Self {
        Self {
            total: records.len(),
            unread: records.iter().filter(|r| !r.read).count(),
            high_priority: records.iter().filter(|r| r.is_high_priority()).count(),
        }
    }
}

struct FeedState {
    /// Newest first
    records: VecDeque<NotificationRecord>,
    last_sequence: u64,
}

impl FeedState {
    fn next_id(&mut self) -> NotificationId {
        self.last_sequence += 1;
        NotificationId::from_sequence(self.last_sequence)
    }

    /// Insert at the head, then evict from the tail down to `cap`
    fn insert(&mut self, record: NotificationRecord, cap: usize) -> usize {
        self.records.push_front(record);
        let mut evicted = 0;
        while self.records.len() > cap {
            self.records.pop_back();
            evicted += 1;
        }
        evicted
    }

    fn position(&self, id: &NotificationId) -> Option<usize> {
        self.records.iter().position(|r| r.id == *id)
    }

    fn snapshot(&self) -> FeedSnapshot {
        self.records.iter().cloned().collect()
    }
}

struct StoreInner {
    state: Mutex<FeedState>,
    registry: Arc<ListenerRegistry>,
    retention_cap: usize,
}

/// Process-wide notification feed
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<StoreInner>,
}

impl NotificationStore {
    /// Create an empty store with the given configuration
    pub fn new(config: &FeedConfig) -> NotificationResult<Self> {
        config.validate()?;
        Ok(Self::with_cap(config.retention_cap))
    }

    /// Create an empty store with a custom retention cap
    pub fn with_retention_cap(retention_cap: usize) -> NotificationResult<Self> {
        if retention_cap == 0 {
            return Err(NotificationError::invalid_config("retention cap must be at least 1"));
        }
        Ok(Self::with_cap(retention_cap))
    }

    fn with_cap(retention_cap: usize) -> Self {
        debug!("Creating notification store (retention cap {})", retention_cap);
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(FeedState {
                    records: VecDeque::with_capacity(retention_cap.min(1024)),
                    last_sequence: 0,
                }),
                registry: Arc::new(ListenerRegistry::new()),
                retention_cap,
            }),
        }
    }

    pub fn retention_cap(&self) -> usize {
        self.inner.retention_cap
    }

    /// Apply a transition under the dispatch lock; `true` from the closure
    /// means the feed changed and subscribers must hear about it.
    fn apply<R>(&self, transition: impl FnOnce(&mut FeedState) -> (R, bool)) -> R {
        self.inner.registry.publish(|| {
            let mut state = self.inner.state.lock();
            let (result, changed) = transition(&mut state);
            let snapshot = changed.then(|| state.snapshot());
            (result, snapshot)
        })
    }

    /// Record a new notification at the head of the feed
    pub fn add_notification(&self, fields: NewNotification) -> NotificationResult<NotificationId> {
        fields.validate()?;
        let cap = self.inner.retention_cap;

        let id = self.apply(|state| {
            let id = state.next_id();
            let record = NotificationRecord::create(id, fields, Utc::now());
            let evicted = state.insert(record, cap);
            if evicted > 0 {
                debug!("Retention cap {} reached, evicted {} oldest notification(s)", cap, evicted);
            }
            (id, true)
        });

        debug!("Added {}", id);
        Ok(id)
    }

    /// Flag one record as read; unknown ids are ignored
    pub fn mark_as_read(&self, id: &NotificationId) -> bool {
        self.apply(|state| match state.position(id) {
            Some(index) => {
                state.records[index].read = true;
                (true, true)
            }
            None => {
                debug!("mark_as_read: {} not present", id);
                (false, false)
            }
        })
    }

    /// Flag every record as read, with a single update to subscribers
    pub fn mark_all_as_read(&self) {
        self.apply(|state| {
            state.records.iter_mut().for_each(|r| r.read = true);
            ((), true)
        })
    }

    /// Remove one record. Subscribers are notified even when the id is unknown.
    pub fn delete_notification(&self, id: &NotificationId) -> bool {
        self.apply(|state| match state.position(id) {
            Some(index) => {
                state.records.remove(index);
                (true, true)
            }
            None => {
                debug!("delete_notification: {} not present", id);
                (false, true)
            }
        })
    }

    /// Empty the feed
    pub fn clear_all(&self) {
        self.apply(|state| {
            state.records.clear();
            ((), true)
        })
    }

    /// Copy of the feed, newest first
    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.inner.state.lock().records.iter().cloned().collect()
    }

    pub fn get(&self, id: &NotificationId) -> Option<NotificationRecord> {
        let state = self.inner.state.lock();
        state.position(id).map(|index| state.records[index].clone())
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn unread_count(&self) -> usize {
        self.inner.state.lock().records.iter().filter(|r| !r.read).count()
    }

    pub fn high_priority_count(&self) -> usize {
        self.inner.state.lock().records.iter().filter(|r| r.is_high_priority()).count()
    }

    pub fn summary(&self) -> FeedSummary {
        let state = self.inner.state.lock();
        let records = state.records.iter();
        FeedSummary {
            total: state.records.len(),
            unread: records.clone().filter(|r| !r.read).count(),
            high_priority: records.filter(|r| r.is_high_priority()).count(),
        }
    }

    /// Register a subscriber; it receives the current feed immediately and
    /// every subsequent change until unsubscribed.
    pub fn subscribe(&self, subscriber: Arc<dyn FeedSubscriber>) -> Subscription {
        let id = self.inner.registry.register(subscriber, || self.inner.state.lock().snapshot());
        Subscription::new(id, &self.inner.registry)
    }

    /// Register a closure as subscriber
    pub fn subscribe_fn<F>(&self, id: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&[NotificationRecord]) -> NotificationResult<()> + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnSubscriber::new(id, handler)))
    }

    /// Remove a registration by id; returns false if it was already removed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.registry.unregister(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.registry.subscriber_count()
    }

    pub fn delivery_stats(&self) -> DeliveryStats {
        self.inner.registry.stats()
    }

    /// Insert one illustrative record per category, backdated between 5 and
    /// 60 minutes, the three oldest already read.
    pub fn seed_sample_data(&self) {
        let cap = self.inner.retention_cap;
        let now = Utc::now();

        self.apply(|state| {
            // Oldest first so the newest ends up at the head.
            for (minutes_ago, read, fields) in sample_notifications().into_iter().rev() {
                let id = state.next_id();
                let mut record = NotificationRecord::create(id, fields, now - ChronoDuration::minutes(minutes_ago));
                record.read = read;
                state.insert(record, cap);
            }
            ((), true)
        });

        info!("Seeded notification feed with sample data ({} records)", self.len());
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::with_cap(DEFAULT_RETENTION_CAP)
    }
}

/// (minutes ago, read, fields), newest first
fn sample_notifications() -> Vec<(i64, bool, NewNotification)> {
    vec![
        (
            5,
            false,
            NewNotification::new(
                "Low Stock Alert",
                "Paracetamol stock is running low. Current stock: 15 units",
                NotificationType::Warning,
                Category::Inventory,
                Priority::High,
            )
            .with_action_url("/inventory"),
        ),
        (
            15,
            false,
            NewNotification::new(
                "ML Prediction Complete",
                "Medicine demand prediction for next month has been calculated",
                NotificationType::Success,
                Category::Ml,
                Priority::Medium,
            )
            .with_action_url("/ml-predictions"),
        ),
        (
            30,
            true,
            NewNotification::new(
                "New Marketplace Order",
                "Order #12345 has been placed for 50 units of Aspirin",
                NotificationType::Info,
                Category::Marketplace,
                Priority::Medium,
            )
            .with_action_url("/marketplace"),
        ),
        (
            45,
            true,
            NewNotification::new(
                "AI Medicine Recommendation",
                "New medicine recommendation available for patient consultation",
                NotificationType::Info,
                Category::Ai,
                Priority::Low,
            )
            .with_action_url("/medicine-recommendation"),
        ),
        (
            60,
            true,
            NewNotification::new(
                "System Update",
                "Blockchain synchronization completed successfully",
                NotificationType::Success,
                Category::System,
                Priority::Low,
            ),
        ),
    ]
}
