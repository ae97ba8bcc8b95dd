//! Consumer Binding
//!
//! [`FeedContext`] is what a dashboard holds: one subscription to the store,
//! the latest feed with its derived counts, and the mutation operations.
//! Async consumers await [`FeedContext::changes`] instead of registering a
//! callback of their own.

use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::notifications::error::NotificationResult;
use crate::notifications::record::{NewNotification, NotificationId, NotificationRecord};
use crate::notifications::registry::Subscription;
use crate::notifications::store::{FeedSummary, NotificationStore};

/// Feed contents plus counts, as last delivered by the store
#[derive(Debug, Clone, PartialEq)]
pub struct FeedView {
    pub notifications: Arc<[NotificationRecord]>,
    pub unread_count: usize,
    pub high_priority_count: usize,
}

impl Default for FeedView {
    fn default() -> Self {
        Self {
            notifications: Arc::from(Vec::new()),
            unread_count: 0,
            high_priority_count: 0,
        }
    }
}

impl FeedView {
    fn from_snapshot(notifications: &[NotificationRecord]) -> Self {
        let summary = FeedSummary::of(notifications);
        Self {
            notifications: notifications.into(),
            unread_count: summary.unread,
            high_priority_count: summary.high_priority,
        }
    }
}

/// Subscribed view of a store; unsubscribes when dropped
pub struct FeedContext {
    store: NotificationStore,
    subscription: Subscription,
    view: watch::Receiver<FeedView>,
}

impl FeedContext {
    pub fn new(store: &NotificationStore, name: impl Into<String>) -> Self {
        let (tx, rx) = watch::channel(FeedView::default());
        let subscription = store.subscribe_fn(name, move |notifications| {
            // send_replace never fails, even with no receivers left
            tx.send_replace(FeedView::from_snapshot(notifications));
            Ok(())
        });

        Self {
            store: store.clone(),
            subscription,
            view: rx,
        }
    }

    /// Latest view
    pub fn view(&self) -> FeedView {
        self.view.borrow().clone()
    }

    /// Stream yielding the current view, then every subsequent one
    pub fn changes(&self) -> WatchStream<FeedView> {
        WatchStream::new(self.view.clone())
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    pub fn add_notification(&self, fields: NewNotification) -> NotificationResult<NotificationId> {
        self.store.add_notification(fields)
    }

    pub fn mark_as_read(&self, id: &NotificationId) -> bool {
        self.store.mark_as_read(id)
    }

    pub fn mark_all_as_read(&self) {
        self.store.mark_all_as_read()
    }

    pub fn delete_notification(&self, id: &NotificationId) -> bool {
        self.store.delete_notification(id)
    }

    pub fn clear_all(&self) {
        self.store.clear_all()
    }
}

impl Drop for FeedContext {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use crate::notifications::producers::inventory_alert;

    #[test]
    fn test_context_tracks_store() {
        let store = NotificationStore::default();
        store.simulate_ml_prediction(91.0).unwrap();

        let context = FeedContext::new(&store, "dashboard");
        assert_eq!(context.view().notifications.len(), 1);
        assert_eq!(context.view().unread_count, 1);
        assert_eq!(context.view().high_priority_count, 0);

        let id = context.add_notification(inventory_alert("Saline", 3)).unwrap();
        let view = context.view();
        assert_eq!(view.notifications.len(), 2);
        assert_eq!(view.notifications[0].id, id);
        assert_eq!(view.high_priority_count, 1);

        context.mark_all_as_read();
        assert_eq!(context.view().unread_count, 0);

        assert!(context.delete_notification(&id));
        assert_eq!(context.view().high_priority_count, 0);

        context.clear_all();
        assert!(context.view().notifications.is_empty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let store = NotificationStore::default();
        {
            let _context = FeedContext::new(&store, "panel");
            assert_eq!(store.subscriber_count(), 1);
        }
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_changes_stream() {
        let store = NotificationStore::default();
        let context = FeedContext::new(&store, "stream");
        let mut changes = context.changes();

        let initial = changes.next().await.unwrap();
        assert!(initial.notifications.is_empty());

        store.simulate_ai_recommendation("Ibuprofen").unwrap();
        let updated = changes.next().await.unwrap();
        assert_eq!(updated.notifications.len(), 1);
        assert_eq!(updated.unread_count, 1);
    }
}
