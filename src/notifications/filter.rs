//! Feed filtering and age formatting for display.
//!
//! Pure functions over a snapshot; nothing here touches the store.

use std::str::FromStr;
use chrono::{DateTime, Utc};

use crate::notifications::error::NotificationError;
use crate::notifications::record::{Category, NotificationRecord};

/// Which records a panel shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadFilter {
    #[default]
    All,
    Unread,
    HighPriority,
}

impl FromStr for ReadFilter {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "unread" => Ok(Self::Unread),
            "high" | "high-priority" => Ok(Self::HighPriority),
            _ => Err(NotificationError::unknown_variant("filter", s)),
        }
    }
}

/// Combined view filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub mode: ReadFilter,
    pub category: Option<Category>,
}

impl FeedFilter {
    pub fn new(mode: ReadFilter) -> Self {
        Self { mode, category: None }
    }

    pub fn in_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches(&self, record: &NotificationRecord) -> bool {
        let mode_ok = match self.mode {
            ReadFilter::All => true,
            ReadFilter::Unread => !record.read,
            ReadFilter::HighPriority => record.is_high_priority(),
        };
        mode_ok && self.category.map_or(true, |c| record.category == c)
    }

    /// Matching records, order preserved
    pub fn apply<'a>(&self, records: &'a [NotificationRecord]) -> Vec<&'a NotificationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// "just now", "12m ago", "3h ago", "2d ago"
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::notifications::record::{NewNotification, NotificationId, NotificationType, Priority};

    fn record(seq: u64, category: Category, priority: Priority, read: bool) -> NotificationRecord {
        let fields = NewNotification::new("t", "m", NotificationType::Info, category, priority);
        let mut r = NotificationRecord::create(NotificationId::from_sequence(seq), fields, Utc::now());
        r.read = read;
        r
    }

    #[test]
    fn test_filter_modes() {
        let records = vec![
            record(3, Category::Inventory, Priority::High, false),
            record(2, Category::Ml, Priority::Low, true),
            record(1, Category::Inventory, Priority::Medium, false),
        ];

        assert_eq!(FeedFilter::default().apply(&records).len(), 3);

        let unread = FeedFilter::new(ReadFilter::Unread).apply(&records);
        assert_eq!(unread.iter().map(|r| r.id.sequence()).collect::<Vec<_>>(), vec![3, 1]);

        let high = FeedFilter::new(ReadFilter::HighPriority).apply(&records);
        assert_eq!(high.len(), 1);

        let inventory_unread = FeedFilter::new(ReadFilter::Unread).in_category(Category::Inventory);
        assert_eq!(inventory_unread.apply(&records).len(), 2);
        assert!(FeedFilter::default().in_category(Category::Ai).apply(&records).is_empty());
    }

    #[test]
    fn test_read_filter_parsing() {
        assert_eq!("unread".parse::<ReadFilter>().unwrap(), ReadFilter::Unread);
        assert_eq!("HIGH".parse::<ReadFilter>().unwrap(), ReadFilter::HighPriority);
        assert!("starred".parse::<ReadFilter>().is_err());
    }

    #[test]
    fn test_relative_age() {
        let now = Utc::now();
        assert_eq!(relative_age(now, now), "just now");
        assert_eq!(relative_age(now - Duration::seconds(59), now), "just now");
        assert_eq!(relative_age(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_age(now - Duration::minutes(90), now), "1h ago");
        assert_eq!(relative_age(now - Duration::hours(49), now), "2d ago");
    }
}
