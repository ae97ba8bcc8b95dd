//! Notification Records
//!
//! Defines the single entity held by the feed and the closed classification
//! enums attached to it. Records are created only by the store; producers
//! hand in a [`NewNotification`] and receive the assigned [`NotificationId`].

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notifications::error::{NotificationError, NotificationResult};

const ID_PREFIX: &str = "notification-";

/// Opaque, never-reused identifier of a notification record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    pub(crate) fn from_sequence(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Creation sequence number; later records always carry larger values
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ID_PREFIX, self.0)
    }
}

impl FromStr for NotificationId {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix(ID_PREFIX)
            .and_then(|n| n.parse::<u64>().ok())
            .map(Self)
            .ok_or_else(|| NotificationError::unknown_variant("notification id", s))
    }
}

/// Severity / outcome classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Success,
    Error,
    Info,
    Warning,
}

/// Originating subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Inventory,
    Marketplace,
    Ml,
    Ai,
    System,
}

/// Urgency, independent of [`NotificationType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl NotificationType {
    pub const ALL: [NotificationType; 4] = [Self::Success, Self::Error, Self::Info, Self::Warning];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Inventory,
        Self::Marketplace,
        Self::Ml,
        Self::Ai,
        Self::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Marketplace => "marketplace",
            Self::Ml => "ml",
            Self::Ai => "ai",
            Self::System => "system",
        }
    }
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

macro_rules! closed_enum_str {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = NotificationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| NotificationError::unknown_variant($kind, s))
            }
        }
    };
}

closed_enum_str!(NotificationType, "notification type");
closed_enum_str!(Category, "category");
closed_enum_str!(Priority, "priority");

/// Producer input for [`crate::notifications::NotificationStore::add_notification`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub category: Category,
    pub priority: Priority,
    #[serde(default, rename = "actionUrl", skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl NewNotification {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationType,
        category: Category,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            category,
            priority,
            action_url: None,
        }
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    /// Reject input that would put an unlabelled record in the feed
    pub fn validate(&self) -> NotificationResult<()> {
        if self.title.trim().is_empty() {
            return Err(NotificationError::invalid_field("title", "must not be blank"));
        }
        if self.message.trim().is_empty() {
            return Err(NotificationError::invalid_field("message", "must not be blank"));
        }
        Ok(())
    }
}

/// One entry of the notification feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub category: Category,
    pub priority: Priority,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(default, rename = "actionUrl", skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl NotificationRecord {
    pub(crate) fn create(id: NotificationId, fields: NewNotification, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            message: fields.message,
            kind: fields.kind,
            category: fields.category,
            priority: fields.priority,
            timestamp,
            read: false,
            action_url: fields.action_url,
        }
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == Priority::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_parsing_is_closed() {
        assert_eq!("warning".parse::<NotificationType>().unwrap(), NotificationType::Warning);
        assert_eq!(" ML ".parse::<Category>().unwrap(), Category::Ml);
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);

        let err = "critical".parse::<Priority>().unwrap_err();
        assert_eq!(err, NotificationError::unknown_variant("priority", "critical"));
        assert!("billing".parse::<Category>().is_err());
        assert!("fatal".parse::<NotificationType>().is_err());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[test]
    fn test_id_display_and_parse() {
        let id = NotificationId::from_sequence(42);
        assert_eq!(id.to_string(), "notification-42");
        assert_eq!("notification-42".parse::<NotificationId>().unwrap(), id);
        assert!("42".parse::<NotificationId>().is_err());
        assert!("notification-x".parse::<NotificationId>().is_err());
    }

    #[test]
    fn test_new_notification_validation() {
        let ok = NewNotification::new("Low Stock", "X low", NotificationType::Warning, Category::Inventory, Priority::High);
        assert!(ok.validate().is_ok());

        let blank_title = NewNotification::new("  ", "X low", NotificationType::Warning, Category::Inventory, Priority::High);
        assert!(matches!(blank_title.validate(), Err(NotificationError::InvalidField { field: "title", .. })));

        let blank_message = NewNotification::new("Low Stock", "", NotificationType::Warning, Category::Inventory, Priority::High);
        assert!(matches!(blank_message.validate(), Err(NotificationError::InvalidField { field: "message", .. })));
    }

    #[test]
    fn test_record_json_shape() {
        let fields = NewNotification::new("Low Stock", "X low", NotificationType::Warning, Category::Inventory, Priority::High)
            .with_action_url("/inventory");
        let record = NotificationRecord::create(NotificationId::from_sequence(1), fields, Utc::now());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["type"], "warning");
        assert_eq!(json["category"], "inventory");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["read"], false);
        assert_eq!(json["actionUrl"], "/inventory");
    }

    #[test]
    fn test_new_notification_rejects_unknown_enum_in_json() {
        let raw = r#"{"title":"t","message":"m","type":"fatal","category":"inventory","priority":"low"}"#;
        assert!(serde_json::from_str::<NewNotification>(raw).is_err());

        let raw = r#"{"title":"t","message":"m","type":"info","category":"inventory","priority":"low"}"#;
        let parsed: NewNotification = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.action_url, None);
    }
}
