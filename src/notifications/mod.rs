//! Notification Feed
//!
//! In-process store of supply-chain notifications with subscriber fan-out.
//!
//! # Architecture
//!
//! - **NotificationStore**: owns the records, applies mutations, derives counts
//! - **Registry**: delivers one snapshot per state change to every subscriber
//! - **Producers**: anything calling `add_notification` (UI actions, backend
//!   handlers, the `simulate_*` helpers, an [`EventPump`])
//! - **EventSource**: autonomous producers; [`SyntheticEventSource`] stands in
//!   for real inventory/marketplace/ML feeds
//! - **FeedContext**: consumer binding holding the latest view and counts
//!
//! # Example Usage
//!
//! ```no_run
//! use supplyfeed::notifications::{NotificationStore, FeedConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = NotificationStore::new(&FeedConfig::default())?;
//!
//! let subscription = store.subscribe_fn("badge", |feed| {
//!     println!("{} notifications", feed.len());
//!     Ok(())
//! });
//!
//! let id = store.simulate_inventory_alert("Paracetamol", 5)?;
//! store.mark_as_read(&id);
//! assert_eq!(store.unread_count(), 0);
//!
//! subscription.unsubscribe();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod generator;
pub mod producers;
pub mod pump;
pub mod record;
pub mod registry;
pub mod store;
pub mod traits;


// Re-export core types for convenience
pub use config::{FeedConfig, GeneratorConfig};
pub use context::{FeedContext, FeedView};
pub use error::{NotificationError, NotificationResult};
pub use filter::{relative_age, FeedFilter, ReadFilter};
pub use generator::{ChannelEventSource, EventSender, SyntheticEventSource};
pub use producers::WalletEvent;
pub use pump::EventPump;
pub use record::{Category, NewNotification, NotificationId, NotificationRecord, NotificationType, Priority};
pub use registry::{DeliveryStats, Subscription, SubscriptionId};
pub use store::{FeedSummary, NotificationStore};
pub use traits::{EventSource, FeedSubscriber, FnSubscriber};
