//! Subscriber and Event Source Traits
//!
//! The two seams of the feed: consumers implement [`FeedSubscriber`] to receive
//! every state change, producers that run on their own schedule implement
//! [`EventSource`] and are driven by an [`crate::notifications::EventPump`].

use async_trait::async_trait;

use crate::notifications::error::NotificationResult;
use crate::notifications::record::{NewNotification, NotificationRecord};

/// Receives the full, newest-first feed after every state change
pub trait FeedSubscriber: Send + Sync {
    /// Handle an updated snapshot of the feed
    fn on_update(&self, notifications: &[NotificationRecord]) -> NotificationResult<()>;

    /// Identifier used in logs and delivery errors
    fn subscriber_id(&self) -> &str {
        "anonymous"
    }
}

/// Adapts a closure into a [`FeedSubscriber`]
pub struct FnSubscriber<F> {
    id: String,
    handler: F,
}

impl<F> FnSubscriber<F>
where
    F: Fn(&[NotificationRecord]) -> NotificationResult<()> + Send + Sync,
{
    pub fn new(id: impl Into<String>, handler: F) -> Self {
        Self { id: id.into(), handler }
    }
}

impl<F> FeedSubscriber for FnSubscriber<F>
where
    F: Fn(&[NotificationRecord]) -> NotificationResult<()> + Send + Sync,
{
    fn on_update(&self, notifications: &[NotificationRecord]) -> NotificationResult<()> {
        (self.handler)(notifications)
    }

    fn subscriber_id(&self) -> &str {
        &self.id
    }
}

/// Autonomous producer of notifications (synthetic generator or real upstream)
#[async_trait]
pub trait EventSource: Send {
    /// Wait for the next event; `None` once the source is exhausted
    async fn next_event(&mut self) -> Option<NewNotification>;

    /// Source name for logging
    fn source_name(&self) -> &str;
}
