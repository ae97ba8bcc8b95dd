//! Listener Registry and Ordered Dispatch
//!
//! Holds the subscribers of one store and delivers feed snapshots to them.
//!
//! # Delivery rules
//!
//! - Every state change yields one immutable snapshot, handed to each listener
//!   registered at the time of the change, in subscription order.
//! - Changes are delivered one round at a time. A change made from inside a
//!   listener (same thread) is queued and delivered once the current round
//!   completes, so no listener observes rounds out of order.
//! - The recipient list is copied before invocation; listeners may subscribe or
//!   unsubscribe during delivery. A listener removed before its turn is skipped.
//! - A listener that fails or panics is logged and counted; the remaining
//!   listeners still receive the snapshot.

use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use log::{debug, error, warn};
use parking_lot::{Mutex, ReentrantMutex};

use crate::notifications::error::NotificationError;
use crate::notifications::record::NotificationRecord;
use crate::notifications::traits::FeedSubscriber;

/// Immutable feed contents shared by every recipient of one round
pub(crate) type FeedSnapshot = Arc<[NotificationRecord]>;

/// Token identifying one registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Statistics about feed delivery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// State changes published to the registry
    pub updates_published: u64,

    /// Successful listener invocations (initial snapshots included)
    pub deliveries: u64,

    /// Listener invocations that returned an error or panicked
    pub listener_failures: u64,
}

type Recipient = (SubscriptionId, Arc<dyn FeedSubscriber>);

struct Delivery {
    snapshot: FeedSnapshot,
    recipients: Vec<Recipient>,
}

#[derive(Default)]
struct DispatchQueue {
    pending: VecDeque<Delivery>,
    draining: bool,
}

struct Listeners {
    entries: BTreeMap<SubscriptionId, Arc<dyn FeedSubscriber>>,
    next_id: u64,
}

pub(crate) struct ListenerRegistry {
    listeners: Mutex<Listeners>,
    dispatch: ReentrantMutex<RefCell<DispatchQueue>>,
    stats: Mutex<DeliveryStats>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Mutex::new(Listeners {
                entries: BTreeMap::new(),
                next_id: 0,
            }),
            dispatch: ReentrantMutex::new(RefCell::new(DispatchQueue::default())),
            stats: Mutex::new(DeliveryStats::default()),
        }
    }

    /// Run a state transition and broadcast its snapshot, if it produced one.
    ///
    /// The transition runs while holding the dispatch lock, so snapshots are
    /// queued in exactly the order the transitions happened.
    pub(crate) fn publish<R>(&self, transition: impl FnOnce() -> (R, Option<FeedSnapshot>)) -> R {
        let guard = self.dispatch.lock();
        let (result, snapshot) = transition();

        if let Some(snapshot) = snapshot {
            self.stats.lock().updates_published += 1;
            let recipients = self.recipients();
            guard.borrow_mut().pending.push_back(Delivery { snapshot, recipients });
            self.drain(&guard);
        }

        result
    }

    /// Register a subscriber and hand it the current snapshot straight away
    pub(crate) fn register(
        &self,
        subscriber: Arc<dyn FeedSubscriber>,
        current: impl FnOnce() -> FeedSnapshot,
    ) -> SubscriptionId {
        let guard = self.dispatch.lock();

        let id = {
            let mut listeners = self.listeners.lock();
            listeners.next_id += 1;
            let id = SubscriptionId(listeners.next_id);
            listeners.entries.insert(id, Arc::clone(&subscriber));
            id
        };
        debug!("Subscribed '{}' to feed as {}", subscriber.subscriber_id(), id);

        let snapshot = current();
        guard.borrow_mut().pending.push_back(Delivery {
            snapshot,
            recipients: vec![(id, subscriber)],
        });
        self.drain(&guard);

        id
    }

    /// Remove a registration; returns false when it was already gone
    pub(crate) fn unregister(&self, id: SubscriptionId) -> bool {
        match self.listeners.lock().entries.remove(&id) {
            Some(subscriber) => {
                debug!("Unsubscribed '{}' ({}) from feed", subscriber.subscriber_id(), id);
                true
            }
            None => false,
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    pub(crate) fn stats(&self) -> DeliveryStats {
        self.stats.lock().clone()
    }

    fn recipients(&self) -> Vec<Recipient> {
        self.listeners
            .lock()
            .entries
            .iter()
            .map(|(id, subscriber)| (*id, Arc::clone(subscriber)))
            .collect()
    }

    fn is_registered(&self, id: SubscriptionId) -> bool {
        self.listeners.lock().entries.contains_key(&id)
    }

    fn drain(&self, queue: &RefCell<DispatchQueue>) {
        {
            let mut queue = queue.borrow_mut();
            if queue.draining {
                // An outer frame on this thread is already delivering.
                return;
            }
            queue.draining = true;
        }

        loop {
            let next = queue.borrow_mut().pending.pop_front();
            let Some(delivery) = next else { break };

            for (id, subscriber) in &delivery.recipients {
                if self.is_registered(*id) {
                    self.deliver(subscriber.as_ref(), &delivery.snapshot);
                }
            }
        }

        queue.borrow_mut().draining = false;
    }

    fn deliver(&self, subscriber: &dyn FeedSubscriber, snapshot: &FeedSnapshot) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| subscriber.on_update(snapshot)));

        let mut stats = self.stats.lock();
        match outcome {
            Ok(Ok(())) => stats.deliveries += 1,
            Ok(Err(e)) => {
                stats.listener_failures += 1;
                warn!("{}", NotificationError::delivery_failed(subscriber.subscriber_id(), e.to_string()));
            }
            Err(payload) => {
                stats.listener_failures += 1;
                let failure = NotificationError::delivery_failed(
                    subscriber.subscriber_id(),
                    format!("panicked: {}", panic_message(payload.as_ref())),
                );
                error!("{}", failure);
            }
        }
    }
}

/// Text of a panic payload raised with a string message
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Handle returned by `subscribe`; unsubscribing is explicit and idempotent
#[must_use = "dropping a Subscription keeps the listener registered; call unsubscribe() to remove it"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, registry: &Arc<ListenerRegistry>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Stop further deliveries; returns false if already unsubscribed
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.unregister(self.id))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
