//! Producer Helpers
//!
//! Factory functions for the notifications the dashboards raise when an
//! external system reports something: a low stock level, a marketplace order,
//! a finished ML prediction, an AI recommendation or a wallet outcome. Each
//! maps onto fixed `{type, category, priority}` values; the store methods
//! `simulate_*` are shorthands that add the result directly.

use crate::notifications::error::NotificationResult;
use crate::notifications::record::{Category, NewNotification, NotificationId, NotificationType, Priority};
use crate::notifications::store::NotificationStore;

pub fn inventory_alert(item: &str, current_stock: u32) -> NewNotification {
    NewNotification::new(
        "Low Stock Alert",
        format!("{} stock is running low. Current stock: {} units", item, current_stock),
        NotificationType::Warning,
        Category::Inventory,
        Priority::High,
    )
    .with_action_url("/inventory")
}

pub fn marketplace_order(order_id: &str, product: &str, quantity: u32) -> NewNotification {
    NewNotification::new(
        "New Marketplace Order",
        format!("Order #{} has been placed for {} units of {}", order_id, quantity, product),
        NotificationType::Info,
        Category::Marketplace,
        Priority::Medium,
    )
    .with_action_url("/marketplace")
}

/// `accuracy` is a percentage (e.g. `95.0`)
pub fn ml_prediction(accuracy: f64) -> NewNotification {
    NewNotification::new(
        "ML Prediction Complete",
        format!("Medicine demand prediction completed with {}% accuracy", accuracy),
        NotificationType::Success,
        Category::Ml,
        Priority::Medium,
    )
    .with_action_url("/ml-predictions")
}

pub fn ai_recommendation(medicine: &str) -> NewNotification {
    NewNotification::new(
        "AI Medicine Recommendation",
        format!("New recommendation available for {}", medicine),
        NotificationType::Info,
        Category::Ai,
        Priority::Low,
    )
    .with_action_url("/medicine-recommendation")
}

/// Outcomes reported by the wallet / marketplace transaction layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    Connected { address: String },
    Disconnected,
    ProviderMissing,
    ConnectionRejected,
    ListingCreated { product: String },
    PurchaseCompleted { product: String },
    InventorySynced,
    TransactionFailed { action: String, reason: String },
}

/// Map a wallet outcome onto the feed.
///
/// Connection lifecycle lands in `system`, anything that touches listings or
/// purchases in `marketplace`. Failures are always high priority.
pub fn wallet_event(event: WalletEvent) -> NewNotification {
    match event {
        WalletEvent::Connected { address } => NewNotification::new(
            "Wallet Connected",
            format!("Wallet {} connected successfully", abbreviate_address(&address)),
            NotificationType::Success,
            Category::System,
            Priority::Low,
        ),
        WalletEvent::Disconnected => NewNotification::new(
            "Wallet Disconnected",
            "Wallet disconnected successfully",
            NotificationType::Info,
            Category::System,
            Priority::Low,
        ),
        WalletEvent::ProviderMissing => NewNotification::new(
            "Wallet Provider Missing",
            "No wallet provider detected. Install a wallet extension to use the marketplace",
            NotificationType::Error,
            Category::System,
            Priority::High,
        ),
        WalletEvent::ConnectionRejected => NewNotification::new(
            "Wallet Connection Rejected",
            "Connection request was rejected by the user",
            NotificationType::Error,
            Category::System,
            Priority::High,
        ),
        WalletEvent::ListingCreated { product } => NewNotification::new(
            "Product Listed",
            format!("{} listed successfully on the marketplace", product),
            NotificationType::Success,
            Category::Marketplace,
            Priority::Medium,
        )
        .with_action_url("/marketplace"),
        WalletEvent::PurchaseCompleted { product } => NewNotification::new(
            "Purchase Completed",
            format!("Purchase of {} completed successfully", product),
            NotificationType::Success,
            Category::Marketplace,
            Priority::Medium,
        )
        .with_action_url("/marketplace"),
        WalletEvent::InventorySynced => NewNotification::new(
            "Inventory Synced",
            "Inventory synced to marketplace successfully",
            NotificationType::Success,
            Category::Marketplace,
            Priority::Low,
        )
        .with_action_url("/marketplace"),
        WalletEvent::TransactionFailed { action, reason } => NewNotification::new(
            "Transaction Failed",
            format!("Failed to {}: {}", action, reason),
            NotificationType::Error,
            Category::Marketplace,
            Priority::High,
        )
        .with_action_url("/marketplace"),
    }
}

fn abbreviate_address(address: &str) -> String {
    if address.len() > 10 && address.is_ascii() {
        format!("{}...{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

impl NotificationStore {
    pub fn simulate_inventory_alert(&self, item: &str, current_stock: u32) -> NotificationResult<NotificationId> {
        self.add_notification(inventory_alert(item, current_stock))
    }

    pub fn simulate_marketplace_order(&self, order_id: &str, product: &str, quantity: u32) -> NotificationResult<NotificationId> {
        self.add_notification(marketplace_order(order_id, product, quantity))
    }

    pub fn simulate_ml_prediction(&self, accuracy: f64) -> NotificationResult<NotificationId> {
        self.add_notification(ml_prediction(accuracy))
    }

    pub fn simulate_ai_recommendation(&self, medicine: &str) -> NotificationResult<NotificationId> {
        self.add_notification(ai_recommendation(medicine))
    }

    pub fn record_wallet_event(&self, event: WalletEvent) -> NotificationResult<NotificationId> {
        self.add_notification(wallet_event(event))
    }
}
